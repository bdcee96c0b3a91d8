use envconfig::Envconfig;

#[derive(Envconfig, Clone)]
pub struct Config {
    #[envconfig(from = "HOST", default = "0.0.0.0")]
    pub host: String,

    // Hosting platforms inject PORT; 8080 is the conventional default.
    #[envconfig(from = "PORT", default = "8080")]
    pub port: u16,

    // Used for integration tests
    #[envconfig(default = "true")]
    pub export_prometheus: bool,
}

impl Config {
    pub fn bind(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
