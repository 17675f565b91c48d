use crate::collectors::{NetworkReader, NETWORK_ADAPTERS, NETWORK_USAGE};
use crate::error::CollectionError;
use crate::models::{LinkState, NetworkAdapterStatus, NetworkInterfaceStat};
use crate::utils::sysfs::{get_file_line, read_hex_from_file, read_number_from_file};
use crate::utils::units::{bytes_to_kb, round_to};
use log::{debug, error};
use std::collections::BTreeMap;
use std::fs::read_dir;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use systemstat::{Platform, System};

const ARPHRD_LOOPBACK: u32 = 772;
const IFF_UP: u32 = 0x1;
const IFF_RUNNING: u32 = 0x40;

/// Raw counter reading for one instance: (name, rx bytes, tx bytes).
pub type CounterSample = (String, u64, u64);

pub struct NetworkCounters {
    sys: System,
    interval: Duration,
    class_net: PathBuf,
}

impl NetworkCounters {
    pub fn new(interval: Duration) -> Self {
        Self {
            sys: System::new(),
            interval,
            class_net: PathBuf::from("/sys/class/net"),
        }
    }

    fn read_counters(&self) -> Result<Vec<CounterSample>, CollectionError> {
        let networks = self
            .sys
            .networks()
            .map_err(|e| CollectionError::io(NETWORK_USAGE, e))?;
        let mut samples = Vec::with_capacity(networks.len());
        for net in networks.values() {
            match self.sys.network_stats(&net.name) {
                Ok(stats) => samples.push((
                    net.name.clone(),
                    stats.rx_bytes.as_u64(),
                    stats.tx_bytes.as_u64(),
                )),
                Err(x) => debug!("No counters for interface {}: {}", net.name, x),
            }
        }
        Ok(samples)
    }
}

impl NetworkReader for NetworkCounters {
    async fn interface_usage(&mut self) -> Result<Vec<NetworkInterfaceStat>, CollectionError> {
        let start = Instant::now();
        let initial = group_by_interface(&self.read_counters()?);
        let window = Instant::now();

        tokio::time::sleep(self.interval).await;

        let last = group_by_interface(&self.read_counters().map_err(|e| {
            error!("Network statistics error getting final stats: {}", e);
            e
        })?);
        let result = interface_rates(&initial, &last, window.elapsed());
        debug!("collect_interface_usage took: {} ms", start.elapsed().as_millis());
        Ok(result)
    }

    fn adapters(&mut self) -> Result<Vec<NetworkAdapterStatus>, CollectionError> {
        let start = Instant::now();
        let result = read_adapters(&self.class_net)?;
        debug!("collect_adapters took: {} ms", start.elapsed().as_millis());
        Ok(result)
    }
}

/// Sum counter instances that report under the same interface name.
pub fn group_by_interface(samples: &[CounterSample]) -> BTreeMap<String, (u64, u64)> {
    let mut grouped: BTreeMap<String, (u64, u64)> = BTreeMap::new();
    for (name, rx, tx) in samples {
        let entry = grouped.entry(name.clone()).or_default();
        entry.0 = entry.0.saturating_add(*rx);
        entry.1 = entry.1.saturating_add(*tx);
    }
    grouped
}

/// Byte deltas over the window converted to KB/s. Interfaces idle in both
/// directions are left out.
pub fn interface_rates(
    initial: &BTreeMap<String, (u64, u64)>,
    last: &BTreeMap<String, (u64, u64)>,
    window: Duration,
) -> Vec<NetworkInterfaceStat> {
    let secs = window.as_secs_f64();
    if secs <= 0.0 {
        return Vec::new();
    }

    last.iter()
        .filter_map(|(name, (rx_end, tx_end))| {
            let (rx_start, tx_start) = initial.get(name)?;
            let received = round_to(bytes_to_kb(rx_end.saturating_sub(*rx_start) as f64 / secs), 2);
            let sent = round_to(bytes_to_kb(tx_end.saturating_sub(*tx_start) as f64 / secs), 2);
            if sent == 0.0 && received == 0.0 {
                return None;
            }
            Some(NetworkInterfaceStat {
                name: name.clone(),
                sent_kb_per_sec: sent,
                received_kb_per_sec: received,
            })
        })
        .collect()
}

/// Enumerate adapters under `/sys/class/net`, skipping loopback.
pub fn read_adapters(class_net: &Path) -> Result<Vec<NetworkAdapterStatus>, CollectionError> {
    let dir = read_dir(class_net).map_err(|e| CollectionError::io(NETWORK_ADAPTERS, e))?;

    let mut adapters = Vec::new();
    for entry in dir.flatten() {
        let folder = entry.path();
        let Some(name) = folder.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            continue;
        };
        if read_number_from_file::<u32>(&folder.join("type")) == Some(ARPHRD_LOOPBACK) {
            continue;
        }

        let operstate = get_file_line(&folder.join("operstate"), 16).unwrap_or_default();
        let flags = read_hex_from_file(&folder.join("flags")).unwrap_or(0);
        // `speed` reads as -1 or fails outright when the link is down.
        let link_speed_mbps = read_number_from_file::<i64>(&folder.join("speed"))
            .filter(|speed| *speed > 0)
            .map(|speed| speed as u64);

        adapters.push(NetworkAdapterStatus {
            name,
            state: link_state(&operstate, flags),
            link_speed_mbps,
        });
    }
    adapters.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(adapters)
}

/// An administratively enabled interface without carrier is reported as
/// disconnected (cable unplugged); a disabled one as down. Tunnels report
/// `unknown` while running, so the interface flags decide for them.
pub fn link_state(operstate: &str, flags: u32) -> LinkState {
    let admin_up = flags & IFF_UP != 0;
    let running = admin_up && flags & IFF_RUNNING != 0;
    match operstate {
        "up" => LinkState::Up,
        "unknown" if running => LinkState::Up,
        "down" if admin_up => LinkState::Disconnected,
        "down" => LinkState::Down,
        "lowerlayerdown" => LinkState::Disconnected,
        "dormant" => LinkState::Dormant,
        "notpresent" => LinkState::NotPresent,
        "testing" => LinkState::Testing,
        _ => LinkState::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sample(name: &str, rx: u64, tx: u64) -> CounterSample {
        (name.to_string(), rx, tx)
    }

    fn fake_adapter(root: &Path, name: &str, operstate: &str, flags: &str, speed: Option<&str>, kind: u32) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("operstate"), format!("{operstate}\n")).unwrap();
        fs::write(dir.join("flags"), format!("{flags}\n")).unwrap();
        fs::write(dir.join("type"), format!("{kind}\n")).unwrap();
        if let Some(speed) = speed {
            fs::write(dir.join("speed"), format!("{speed}\n")).unwrap();
        }
    }

    #[test]
    fn test_group_by_interface_sums_instances() {
        let grouped = group_by_interface(&[
            sample("eth0", 100, 10),
            sample("eth0", 50, 5),
            sample("wlan0", 1, 2),
        ]);
        assert_eq!(grouped.get("eth0"), Some(&(150, 15)));
        assert_eq!(grouped.get("wlan0"), Some(&(1, 2)));
    }

    #[test]
    fn test_interface_rates_converts_to_kb_per_sec() {
        let initial = group_by_interface(&[sample("eth0", 0, 0), sample("idle0", 500, 500)]);
        let last = group_by_interface(&[
            sample("eth0", 2048 * 2, 1536 * 2),
            sample("idle0", 500, 500),
            sample("new0", 9999, 9999),
        ]);
        let rates = interface_rates(&initial, &last, Duration::from_secs(2));
        assert_eq!(
            rates,
            vec![NetworkInterfaceStat {
                name: "eth0".into(),
                sent_kb_per_sec: 1.5,
                received_kb_per_sec: 2.0,
            }]
        );
    }

    #[test]
    fn test_interface_rates_round_to_two_decimals() {
        let initial = group_by_interface(&[sample("eth0", 0, 0)]);
        let last = group_by_interface(&[sample("eth0", 1000, 0)]);
        let rates = interface_rates(&initial, &last, Duration::from_secs(1));
        assert_eq!(rates[0].received_kb_per_sec, 0.98);
        assert_eq!(rates[0].sent_kb_per_sec, 0.0);
    }

    #[test]
    fn test_link_state_mapping() {
        assert_eq!(link_state("up", 0x1003), LinkState::Up);
        assert_eq!(link_state("down", 0x1003), LinkState::Disconnected);
        assert_eq!(link_state("down", 0x1002), LinkState::Down);
        assert_eq!(link_state("lowerlayerdown", 0), LinkState::Disconnected);
        assert_eq!(link_state("dormant", 0x1), LinkState::Dormant);
        assert_eq!(link_state("unknown", 0x10d1), LinkState::Up);
        assert_eq!(link_state("unknown", 0x1091), LinkState::Unknown);
        assert_eq!(link_state("unknown", 0x40), LinkState::Unknown);
    }

    #[test]
    fn test_read_adapters_from_sysfs() {
        let root = tempdir().unwrap();
        fake_adapter(root.path(), "lo", "unknown", "0x9", None, ARPHRD_LOOPBACK);
        fake_adapter(root.path(), "eth0", "up", "0x1003", Some("1000"), 1);
        fake_adapter(root.path(), "eth1", "down", "0x1003", Some("-1"), 1);
        fake_adapter(root.path(), "wlan0", "down", "0x1002", None, 1);

        let adapters = read_adapters(root.path()).unwrap();
        assert_eq!(
            adapters,
            vec![
                NetworkAdapterStatus {
                    name: "eth0".into(),
                    state: LinkState::Up,
                    link_speed_mbps: Some(1000),
                },
                NetworkAdapterStatus {
                    name: "eth1".into(),
                    state: LinkState::Disconnected,
                    link_speed_mbps: None,
                },
                NetworkAdapterStatus {
                    name: "wlan0".into(),
                    state: LinkState::Down,
                    link_speed_mbps: None,
                },
            ]
        );
    }

    #[test]
    fn test_running_tunnel_with_unknown_operstate_is_up() {
        let root = tempdir().unwrap();
        fake_adapter(root.path(), "wg0", "unknown", "0x10d1", None, 65534);
        fake_adapter(root.path(), "tun1", "unknown", "0x1041", None, 65534);
        fake_adapter(root.path(), "tun0", "unknown", "0x1090", None, 65534);

        let adapters = read_adapters(root.path()).unwrap();
        let states: Vec<(&str, LinkState)> =
            adapters.iter().map(|a| (a.name.as_str(), a.state)).collect();
        assert_eq!(
            states,
            vec![("tun0", LinkState::Unknown), ("tun1", LinkState::Up), ("wg0", LinkState::Up)]
        );
        let alerts = crate::alerts::evaluate_alerts(None, &[], &adapters, &[]);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].message, "Network adapter 'tun0' is Unknown");
    }

    #[test]
    fn test_read_adapters_missing_root_is_an_error() {
        let root = tempdir().unwrap();
        let err = read_adapters(&root.path().join("missing")).unwrap_err();
        assert_eq!(err.category(), NETWORK_ADAPTERS);
    }
}
