//! `crossviz-demo` -- runs one cross-visitation page session against the
//! in-memory services and a JSON-file parameter store, logging the derived
//! filter state along the way.
//!
//! Run it twice: the second run picks the persisted selection back up from
//! the store file.
//!
//! # Environment variables
//!
//! | Variable            | Required | Default                  | Description                    |
//! |---------------------|----------|--------------------------|--------------------------------|
//! | `FILTER_STORE_PATH` | no       | `crossviz-filters.json`  | Path of the parameter store    |
//! | `LAYOUT_ID`         | no       | `mall-1`                 | Layout id to resolve           |

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crossviz_core::entity::{Entity, EntityType, Relation};
use crossviz_core::filter::{CrossVisitationSlice, FilterConfig, FilterPatch};
use crossviz_core::layout::{Layout, LayoutView};
use crossviz_services::{
    BroadcastSettingsService, InMemoryFilterSettings, RecordingNotifier, SettingsStatus,
    SettingsStatusCode, StaticEntitiesService, StaticTranslations, StaticUrlParams,
};
use crossviz_session::{PageSession, SessionServices};
use crossviz_store::JsonFileParameterStore;

/// Page segment the demo session runs under.
const PAGE_SEGMENT: &str = "cross-visitation";

const DEFAULT_STORE_PATH: &str = "crossviz-filters.json";

fn entity(id: &str, entity_type: EntityType, name: &str) -> Entity {
    Entity {
        id: id.to_string(),
        entity_type,
        name: name.to_string(),
    }
}

/// A small mall: four tenants, two zones, one floor, all mapped.
fn sample_entities() -> Vec<Entity> {
    vec![
        entity("t-espresso", EntityType::Tenant, "Espresso Corner"),
        entity("t-books", EntityType::Tenant, "Book Nook"),
        entity("t-sneakers", EntityType::Tenant, "Sneaker Lab"),
        entity("t-grocer", EntityType::Tenant, "Daily Grocer"),
        entity("z-atrium", EntityType::Zone, "Atrium"),
        entity("z-foodcourt", EntityType::Zone, "Food Court"),
        entity("f-ground", EntityType::Floor, "Ground Floor"),
    ]
}

fn sample_relations() -> Vec<Relation> {
    vec![
        Relation {
            from_id: "t-espresso".into(),
            to_id: "z-foodcourt".into(),
        },
        Relation {
            from_id: "t-books".into(),
            to_id: "z-atrium".into(),
        },
    ]
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crossviz=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store_path =
        std::env::var("FILTER_STORE_PATH").unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string());
    let layout_id = std::env::var("LAYOUT_ID").unwrap_or_else(|_| "mall-1".to_string());

    tracing::info!(%store_path, %layout_id, "Starting crossviz-demo");

    let entities = sample_entities();
    let mapping = entities.iter().map(|e| e.id.clone()).collect();
    let entities_service = Arc::new(StaticEntitiesService::new(
        entities,
        mapping,
        sample_relations(),
    ));
    let user_settings = Arc::new(BroadcastSettingsService::new());
    let notifier = Arc::new(RecordingNotifier::default());

    let translate = StaticTranslations::default()
        .with("crossVisitationPage.filter.entityType.Tenant", "Tenant")
        .with("crossVisitationPage.filter.entityType.Zone", "Zone")
        .with("crossVisitationPage.filter.entityType.Floor", "Floor");

    let services = SessionServices {
        entities: entities_service.clone(),
        parameter_store: Arc::new(JsonFileParameterStore::open(&store_path)),
        url_params: Arc::new(StaticUrlParams::empty()),
        filter_settings: Arc::new(InMemoryFilterSettings::default()),
        user_settings: user_settings.clone(),
        translate: Arc::new(translate),
        notifier: notifier.clone(),
    };

    let mut session = PageSession::new(services, PAGE_SEGMENT, FilterConfig::default())
        .expect("default filter config is valid");
    session
        .resolve_layout(Layout::new(
            layout_id,
            LayoutView::Mall,
            Some("Central Mall".to_string()),
        ))
        .await;

    let selected: Vec<&str> = session
        .selected_entities()
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    let (from, to) = session.periods()[0].format_bounds();
    tracing::info!(
        %from,
        %to,
        ?selected,
        selected_type = ?session.selected_entity_type(),
        finder_inits = entities_service.finder_inits().len(),
        "Layout resolved"
    );

    // The user picks a zone counterpart for cross-visitation.
    session
        .accept_filter(FilterPatch {
            cross_visitation: Some(CrossVisitationSlice {
                entity_type: Some(EntityType::Zone),
                entity_id: Some("z-atrium".into()),
                entity_type_title: None,
                entity_title: None,
            }),
            ..Default::default()
        })
        .await;
    tracing::info!(
        filtering_entity = ?session.entity_for_filtering().map(|e| e.name.as_str()),
        "Cross-visitation selection accepted and persisted"
    );

    // Simulate the settings backend saving, then settling.
    user_settings.push(SettingsStatus::new(
        SettingsStatusCode::Processing,
        "Saving filter settings",
    ));
    tokio::time::sleep(Duration::from_millis(10)).await;
    user_settings.push(SettingsStatus::new(
        SettingsStatusCode::Ready,
        "Filter settings saved",
    ));
    tokio::time::sleep(Duration::from_millis(10)).await;

    tracing::info!(
        shown = ?notifier.shown_messages(),
        active = notifier.active_count(),
        "Notification summary"
    );

    session.shutdown();
    tracing::info!("Session shut down");
}
