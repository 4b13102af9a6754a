use gateway::GatewayConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub gateway: GatewayConfig,
    pub max_decode_attempts: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            gateway: GatewayConfig::default(),
            max_decode_attempts: 2,
        }
    }
}
