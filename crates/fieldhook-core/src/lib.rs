//! FieldHook Core: data model, error model and collaborator contracts
//!
//! Everything the template engine, the eligibility filter and the dispatcher
//! share lives here: research descriptors, POI snapshots, webhook targets and
//! the traits through which the engine talks to its external collaborators
//! (localisation, icon themes, geofences, credentials, target storage).

pub mod credentials;
pub mod data_model;
pub mod error;
pub mod geofence;
pub mod i18n;
pub mod icons;
pub mod targets;

pub use credentials::{AesGcmCredentials, CredentialStore, PlaintextCredentials};
pub use data_model::{
    Coordinates, FilterMode, ParamValue, ParseMode, PoiSnapshot, Reporter, ReporterKind,
    ResearchDescriptor, ResearchEvent, ResearchFilter, ResearchKind, ResearchParams, ScalarValue,
    TargetKind, TelegramOptions, WebhookTarget,
};
pub use error::HookError;
pub use geofence::{Geofence, GeofenceLookup, StaticGeofences};
pub use i18n::{Localizer, Translations};
pub use icons::{IconFormat, IconPatterns, IconResolver, IconVariant, PatternIconResolver};
pub use targets::{StaticTargets, TargetSource, YamlTargetSource};

/// Engine version reported by the health endpoint
pub const FIELDHOOK_VERSION: &str = "1.0.0";
