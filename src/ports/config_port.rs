//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
    /// Single-character value. `None` when missing or not exactly one char.
    fn get_char(&self, section: &str, key: &str) -> Option<char>;
}
