use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub store_backend: String,
    pub database_url: String,
    pub data_dir: String,
    pub admin_token: String,
    pub resend_api_key: String,
    pub mail_from: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            store_backend: env::var("STORE_BACKEND").unwrap_or_else(|_| "sqlite".to_string()),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "thar.db".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            resend_api_key: env::var("RESEND_API_KEY").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "bookings@thar.example.com".to_string()),
        }
    }
}
