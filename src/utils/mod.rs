pub mod file;
pub mod sysfs;
pub mod units;
