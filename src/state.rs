use crate::config::AppConfig;
use crate::services::mailer::Mailer;
use crate::store::BookingStore;

pub struct AppState {
    pub config: AppConfig,
    pub store: Box<dyn BookingStore>,
    pub mailer: Box<dyn Mailer>,
}
