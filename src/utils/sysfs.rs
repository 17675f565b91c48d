use std::fs::File;
use std::io::Read;
use std::path::Path;

// Read arbitrary string data.
pub fn get_file_line(file: &Path, capacity: usize) -> Option<String> {
    let mut reader = String::with_capacity(capacity);
    let mut f = File::open(file).ok()?;
    f.read_to_string(&mut reader).ok()?;
    reader.truncate(reader.trim_end().len());
    Some(reader)
}

/// Designed at first for reading an `i32` or `u32` aka `c_long`
/// from a `/sys/class/net` sysfs file.
pub fn read_number_from_file<N>(file: &Path) -> Option<N>
where
    N: std::str::FromStr,
{
    let mut reader = [0u8; 32];
    let mut f = File::open(file).ok()?;
    let n = f.read(&mut reader).ok()?;
    // parse and trim would complain about `\0`.
    let number = &reader[..n];
    let number = std::str::from_utf8(number).ok()?;
    number.trim().trim_end_matches('\0').parse().ok()
}

/// Parse a `0x`-prefixed hexadecimal sysfs value such as `flags`.
pub fn read_hex_from_file(file: &Path) -> Option<u32> {
    let line = get_file_line(file, 16)?;
    let digits = line.strip_prefix("0x").unwrap_or(&line);
    u32::from_str_radix(digits, 16).ok()
}

/// Look up a `key value` line in a `/proc` style table such as `/proc/stat`.
pub fn find_field<N>(contents: &str, key: &str) -> Option<N>
where
    N: std::str::FromStr,
{
    contents.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        if parts.next()? != key {
            return None;
        }
        parts.next()?.parse().ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_file_readers() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("operstate"), "up\n").unwrap();
        fs::write(dir.path().join("speed"), "1000\n").unwrap();
        fs::write(dir.path().join("bad_speed"), "-1\n").unwrap();
        fs::write(dir.path().join("flags"), "0x1003\n").unwrap();

        assert_eq!(get_file_line(&dir.path().join("operstate"), 16).as_deref(), Some("up"));
        assert_eq!(read_number_from_file::<u64>(&dir.path().join("speed")), Some(1000));
        assert_eq!(read_number_from_file::<u64>(&dir.path().join("bad_speed")), None);
        assert_eq!(read_number_from_file::<i64>(&dir.path().join("bad_speed")), Some(-1));
        assert_eq!(read_hex_from_file(&dir.path().join("flags")), Some(0x1003));
        assert_eq!(get_file_line(&dir.path().join("missing"), 16), None);
    }

    #[test]
    fn test_find_field() {
        let stat = "cpu  1 2 3 4\nctxt 99\nprocs_running 7\nprocs_blocked 0\n";
        assert_eq!(find_field::<u64>(stat, "procs_running"), Some(7));
        assert_eq!(find_field::<u64>(stat, "procs_blocked"), Some(0));
        assert_eq!(find_field::<u64>(stat, "procs"), None);
    }
}
