pub struct DefaultsConfig {
    pub host: String,
    pub port: u16,
    pub use_unix: bool,
    pub require_init: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 31415,
            use_unix: false,
            require_init: false,
        }
    }
}
