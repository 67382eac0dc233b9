//! External service contracts of the cross-visitation page, plus in-memory
//! reference implementations used by the demo binary and the integration
//! tests.
//!
//! The page consumes everything network- or platform-shaped through these
//! narrow traits: entity/relation retrieval, preset storage, settings
//! status, URL parameters, translation lookup and the notification sink.

pub mod entities;
pub mod error;
pub mod notify;
pub mod presets;
pub mod settings;
pub mod translate;
pub mod url_params;

pub use entities::{EntitiesService, StaticEntitiesService};
pub use error::ServiceError;
pub use notify::{NotificationId, NotificationOptions, NotificationSink, RecordingNotifier};
pub use presets::{FilterSettingsService, InMemoryFilterSettings};
pub use settings::{BroadcastSettingsService, SettingsStatus, SettingsStatusCode, UserSettingsService};
pub use translate::{StaticTranslations, TranslateService};
pub use url_params::{StaticUrlParams, UrlParamService, URL_KEY_ENTITY_TYPE};
