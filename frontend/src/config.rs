pub struct Config {
    pub api_base_url: &'static str,
    pub vote_timeout_ms: u32,
    pub redirect_delay_ms: u32,
    pub results_refresh_ms: u32,
    pub gate_tick_ms: u32,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            api_base_url: "/api",
            vote_timeout_ms: 8_000,
            redirect_delay_ms: 2_000,
            results_refresh_ms: 3_000,
            gate_tick_ms: 1_000,
        }
    }
}

pub const CONFIG: Config = Config::new();
