pub mod fake_driver;
pub mod test_util;
