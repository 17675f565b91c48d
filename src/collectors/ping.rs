use crate::collectors::{PingProber, PING};
use crate::error::CollectionError;
use crate::models::PingResult;
use log::{debug, warn};
use regex::Regex;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Well-known public resolver used as the latency target.
pub const PING_TARGET: &str = "8.8.8.8";
pub const PING_COUNT: u32 = 2;

const REPLY_TIMEOUT_SECS: u64 = 2;

/// ICMP echo through the system `ping` binary, which avoids needing raw
/// socket privileges.
pub struct SystemPing;

impl PingProber for SystemPing {
    async fn probe(&mut self, target: &str, count: u32) -> Result<Vec<PingResult>, CollectionError> {
        let start = Instant::now();
        let deadline = Duration::from_secs(REPLY_TIMEOUT_SECS * count as u64 + 2);

        let mut command = Command::new("ping");
        command.args(ping_args(target, count)).kill_on_drop(true);
        let output = match tokio::time::timeout(deadline, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(CollectionError::io(PING, e)),
            Err(_elapsed) => {
                warn!("ping to {} did not finish within {:?}", target, deadline);
                return Ok(unanswered(target, count));
            }
        };
        debug!("ping command execution took: {} ms", start.elapsed().as_millis());

        // A non-zero exit just means some requests went unanswered.
        if !output.status.success() {
            debug!("ping exited with {}", output.status);
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_ping_output(target, count, &stdout)
    }
}

#[cfg(windows)]
fn ping_args(target: &str, count: u32) -> Vec<String> {
    vec![
        "-n".into(),
        count.to_string(),
        "-w".into(),
        (REPLY_TIMEOUT_SECS * 1000).to_string(),
        target.into(),
    ]
}

#[cfg(target_os = "macos")]
fn ping_args(target: &str, count: u32) -> Vec<String> {
    vec![
        "-c".into(),
        count.to_string(),
        "-W".into(),
        (REPLY_TIMEOUT_SECS * 1000).to_string(),
        target.into(),
    ]
}

#[cfg(all(not(windows), not(target_os = "macos")))]
fn ping_args(target: &str, count: u32) -> Vec<String> {
    vec![
        "-c".into(),
        count.to_string(),
        "-W".into(),
        REPLY_TIMEOUT_SECS.to_string(),
        target.into(),
    ]
}

fn unanswered(target: &str, count: u32) -> Vec<PingResult> {
    (1..=count)
        .map(|sequence| PingResult {
            target: target.to_string(),
            sequence,
            round_trip_ms: None,
        })
        .collect()
}

/// One result per attempt. Replies carrying `icmp_seq` land on their own
/// attempt (zero-based numbering is shifted up), the rest fill the
/// remaining attempts in the order they were printed.
pub fn parse_ping_output(
    target: &str,
    count: u32,
    output: &str,
) -> Result<Vec<PingResult>, CollectionError> {
    let re = Regex::new(r"(?:icmp_seq=(\d+).*?)?time[=<]([\d.]+)\s*ms")
        .map_err(|e| CollectionError::unavailable(PING, e.to_string()))?;

    let replies: Vec<(Option<u32>, f64)> = output
        .lines()
        .filter_map(|line| {
            let captures = re.captures(line)?;
            let rtt = captures[2].parse::<f64>().ok()?;
            let seq = captures.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            Some((seq, rtt))
        })
        .collect();

    let zero_based = replies.iter().any(|(seq, _)| *seq == Some(0));
    let mut results = unanswered(target, count);
    let mut unplaced = Vec::new();
    for (seq, rtt) in replies {
        let slot = seq
            .map(|s| if zero_based { s + 1 } else { s })
            .filter(|s| *s >= 1 && *s <= count);
        match slot {
            Some(s) => results[(s - 1) as usize].round_trip_ms = Some(rtt),
            None => unplaced.push(rtt),
        }
    }

    let mut unplaced = unplaced.into_iter();
    for result in results.iter_mut().filter(|r| r.round_trip_ms.is_none()) {
        match unplaced.next() {
            Some(rtt) => result.round_trip_ms = Some(rtt),
            None => break,
        }
    }
    Ok(results)
}
