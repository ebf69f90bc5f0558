pub mod google_maps;
pub mod http;
pub mod mock;
pub mod openweather;

pub use google_maps::GoogleMapsTrafficProvider;
pub use mock::MockConditionsProvider;
pub use openweather::OpenWeatherProvider;
