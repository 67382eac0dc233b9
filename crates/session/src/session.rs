//! The page session: exclusive owner of the whole filter state for one
//! page instance.

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, Utc};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crossviz_core::entity::{self, Entity, EntityType, FILTERABLE_TYPES};
use crossviz_core::error::CoreError;
use crossviz_core::filter::{
    CrossVisitationFilterView, CrossVisitationSlice, EntitySelectionView, EntitySlice,
    FilterConfig, FilterPatch, FilterState, PresetAction, PresetGroupView,
};
use crossviz_core::layout::Layout;
use crossviz_core::period::{self, Period};
use crossviz_core::selection;
use crossviz_core::types::{EntityId, PageSegment};
use crossviz_services::{
    EntitiesService, FilterSettingsService, NotificationId, NotificationSink, TranslateService,
    UrlParamService, UserSettingsService, URL_KEY_ENTITY_TYPE,
};
use crossviz_store::{FilterParameterStore, PersistedCrossVisitation, PersistedFilterParameters};

use crate::accumulator::DefaultFilterAccumulator;
use crate::fetch;
use crate::presets::{dismiss_active, spawn_preset_combiner, spawn_settings_notifier};
use crate::settings::PageSettings;
use crate::status::ParamRequestStatus;

/// The external collaborators of a page session, injected as shared
/// handles. Cheaply cloneable.
#[derive(Clone)]
pub struct SessionServices {
    pub entities: Arc<dyn EntitiesService>,
    pub parameter_store: Arc<dyn FilterParameterStore>,
    pub url_params: Arc<dyn UrlParamService>,
    pub filter_settings: Arc<dyn FilterSettingsService>,
    pub user_settings: Arc<dyn UserSettingsService>,
    pub translate: Arc<dyn TranslateService>,
    pub notifier: Arc<dyn NotificationSink>,
}

/// Session state of one cross-visitation page instance.
///
/// Must be created inside a Tokio runtime: construction spawns the
/// settings-notification task. All state is discarded on drop; background
/// tasks are cancelled through one shared token.
pub struct PageSession {
    services: SessionServices,
    segment: PageSegment,
    config: FilterConfig,
    today: NaiveDate,

    layout: Option<Layout>,
    periods: Vec<Period>,
    entities: Vec<Entity>,
    required_entities: Vec<Entity>,
    selected_entities: Vec<Entity>,
    entities_for_filter: EntitySelectionView,
    is_entities_average: bool,
    lead_entity_type: Option<EntityType>,
    selected_entity_type: Option<EntityType>,
    entity_id_for_filtering: Option<EntityId>,
    entity_for_filtering: Option<Entity>,
    cross_visitation_for_filter: CrossVisitationFilterView,
    page_settings: PageSettings,
    request_status: ParamRequestStatus,

    default_filter: DefaultFilterAccumulator,
    preset_view_tx: watch::Sender<PresetGroupView>,
    preset_cancel: Option<CancellationToken>,
    url_params_applied: bool,

    active_notification: Arc<Mutex<Option<NotificationId>>>,
    cancel: CancellationToken,
}

impl PageSession {
    /// Create a session for the given page segment.
    ///
    /// The configuration is validated up front: the selection fallback
    /// depends on `max_selected_entity_count >= 1`, so a zero bound is a
    /// construction error rather than a silently empty selection.
    pub fn new(
        services: SessionServices,
        segment: impl Into<PageSegment>,
        config: FilterConfig,
    ) -> Result<Self, CoreError> {
        config.validate()?;

        let cancel = CancellationToken::new();
        let active_notification = Arc::new(Mutex::new(None));

        spawn_settings_notifier(
            services.user_settings.status_stream(),
            services.notifier.clone(),
            Arc::clone(&active_notification),
            cancel.child_token(),
        );

        let (preset_view_tx, _) = watch::channel(PresetGroupView::default());

        Ok(Self {
            services,
            segment: segment.into(),
            config,
            today: Utc::now().date_naive(),
            layout: None,
            periods: Vec::new(),
            entities: Vec::new(),
            required_entities: Vec::new(),
            selected_entities: Vec::new(),
            entities_for_filter: EntitySelectionView::default(),
            is_entities_average: false,
            lead_entity_type: None,
            selected_entity_type: None,
            entity_id_for_filtering: None,
            entity_for_filtering: None,
            cross_visitation_for_filter: CrossVisitationFilterView::default(),
            page_settings: PageSettings::default(),
            request_status: ParamRequestStatus::default(),
            default_filter: DefaultFilterAccumulator::new(),
            preset_view_tx,
            preset_cancel: None,
            url_params_applied: false,
            active_notification,
            cancel,
        })
    }

    /// Pin the session's "today" used for the default period window.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// React to an upstream layout selection.
    ///
    /// Order matters: lead-type classification, then the one-time URL
    /// ingest (which writes through to the parameter store), then the
    /// persisted-settings read, then the fetch cycle, then the preset
    /// re-subscription.
    pub async fn resolve_layout(&mut self, layout: Layout) {
        tracing::info!(layout_id = %layout.id, title = %layout.title, "Layout resolved");
        self.layout = Some(layout);

        self.update_lead_entity_type();
        self.accept_filter_by_url_params();
        self.update_page_settings();
        self.update_data().await;
        self.init_presets();
    }

    /// Apply a user-issued filter change.
    ///
    /// Each sub-object present in the patch updates its slice
    /// independently; the persistence write and the page-settings
    /// read-back always run, even when nothing semantically changed. A
    /// main-period change that is not value-equal to the previous main
    /// period re-runs the fetch cycle afterwards.
    pub async fn accept_filter(&mut self, patch: FilterPatch) {
        let mut refetch = false;

        if let Some(periods) = patch.periods {
            let previous_main = self.periods.first().cloned();
            self.periods = periods;
            refetch = match (previous_main.as_ref(), self.periods.first()) {
                (Some(previous), Some(current)) => !period::is_equal_periods(previous, current),
                (None, Some(_)) => true,
                _ => false,
            };
        }

        if let Some(entity_slice) = patch.entity {
            self.selected_entities = entity_slice
                .ids
                .iter()
                .filter_map(|id| self.entities.iter().find(|entity| &entity.id == id))
                .cloned()
                .collect();
        }

        if let Some(cross_visitation) = patch.cross_visitation {
            self.selected_entity_type = cross_visitation.entity_type;
            self.entity_id_for_filtering = cross_visitation.entity_id.clone();
            self.entity_for_filtering = cross_visitation
                .entity_id
                .as_ref()
                .and_then(|id| self.entities.iter().find(|entity| &entity.id == id))
                .cloned();
        }

        self.update_filter_parameters_in_storage();
        self.update_page_settings();

        if refetch {
            self.run_fetch_cycle().await;
        }
    }

    /// Forward a preset operation to the settings service under the
    /// current (layout, segment).
    pub fn handle_preset_action(&self, action: PresetAction) {
        if let Some(layout) = &self.layout {
            self.services
                .filter_settings
                .handle_preset_action(&layout.id, &self.segment, action);
        }
    }

    /// Tear the session down: dismiss any remaining notification and
    /// cancel every page-scoped task.
    pub fn shutdown(&mut self) {
        dismiss_active(&self.services.notifier, &self.active_notification);
        self.cancel.cancel();
    }

    // -- accessors ----------------------------------------------------------

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn required_entities(&self) -> &[Entity] {
        &self.required_entities
    }

    pub fn selected_entities(&self) -> &[Entity] {
        &self.selected_entities
    }

    pub fn entity_selection_view(&self) -> &EntitySelectionView {
        &self.entities_for_filter
    }

    pub fn is_entities_average(&self) -> bool {
        self.is_entities_average
    }

    pub fn lead_entity_type(&self) -> Option<EntityType> {
        self.lead_entity_type
    }

    pub fn selected_entity_type(&self) -> Option<EntityType> {
        self.selected_entity_type
    }

    pub fn entity_id_for_filtering(&self) -> Option<&EntityId> {
        self.entity_id_for_filtering.as_ref()
    }

    pub fn entity_for_filtering(&self) -> Option<&Entity> {
        self.entity_for_filtering.as_ref()
    }

    pub fn cross_visitation_view(&self) -> &CrossVisitationFilterView {
        &self.cross_visitation_for_filter
    }

    pub fn filter_config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn request_status(&self) -> &ParamRequestStatus {
        &self.request_status
    }

    pub fn is_param_loading(&self) -> bool {
        self.request_status.is_loading()
    }

    pub fn is_param_error(&self) -> bool {
        self.request_status.is_error()
    }

    pub fn page_settings(&self) -> &PageSettings {
        &self.page_settings
    }

    /// Latest accumulated default filter state.
    pub fn default_filter_state(&self) -> FilterState {
        self.default_filter.latest()
    }

    /// Stream of the accumulated default filter state.
    pub fn default_filter_stream(&self) -> watch::Receiver<FilterState> {
        self.default_filter.subscribe()
    }

    /// Stream of the preset group combined with the latest default state.
    pub fn preset_groups(&self) -> watch::Receiver<PresetGroupView> {
        self.preset_view_tx.subscribe()
    }

    // -- internals ----------------------------------------------------------

    fn update_lead_entity_type(&mut self) {
        if let Some(layout) = &self.layout {
            let lead = self.services.entities.lead_entity_type(layout.view);
            self.lead_entity_type = Some(lead);
            self.config.lead_entity_type = Some(lead);
        }
    }

    /// One-time ingestion of URL parameter overrides.
    ///
    /// Only a complete triple (entity id, non-empty period list, parsable
    /// entity type) is accepted; it is written through to the parameter
    /// store before the persisted settings are read, and the selected
    /// entity type is set directly from the URL value. Partial or
    /// malformed parameter sets are dropped silently.
    fn accept_filter_by_url_params(&mut self) {
        if self.url_params_applied {
            return;
        }
        self.url_params_applied = true;

        let Some(layout) = &self.layout else {
            return;
        };

        let entity_id = self.services.url_params.entity_id();
        let periods = self.services.url_params.period_list();
        let entity_type = self
            .services
            .url_params
            .get(URL_KEY_ENTITY_TYPE)
            .and_then(|raw| raw.parse::<EntityType>().ok());

        if let (Some(entity_id), Some(entity_type)) = (entity_id, entity_type) {
            if periods.is_empty() {
                return;
            }
            tracing::debug!(%entity_id, entity_type = entity_type.as_str(), "Applying URL filter parameters");
            self.services.parameter_store.update_config_for_layout_and_page_path(
                &layout.id,
                &self.segment,
                PersistedFilterParameters {
                    entities_ids: Some(vec![entity_id]),
                    periods: Some(periods),
                    entities_is_average: None,
                    cross_visitation: Some(PersistedCrossVisitation {
                        entity_type: Some(entity_type),
                        entity_id: None,
                    }),
                },
            );
            self.selected_entity_type = Some(entity_type);
        }
    }

    /// Refresh the in-memory page-settings snapshot from the store.
    fn update_page_settings(&mut self) {
        let Some(layout) = &self.layout else {
            return;
        };
        let record = self
            .services
            .parameter_store
            .get_by_layout_and_page_path(&layout.id, &self.segment);
        self.page_settings = PageSettings::from_record(record);
    }

    /// Overwrite the persisted parameter record with the current choice.
    fn update_filter_parameters_in_storage(&self) {
        let Some(layout) = &self.layout else {
            return;
        };
        let parameters = PersistedFilterParameters {
            periods: Some(self.periods.clone()),
            entities_ids: Some(self.selected_entities.iter().map(|e| e.id.clone()).collect()),
            entities_is_average: None,
            cross_visitation: Some(PersistedCrossVisitation {
                entity_type: self.selected_entity_type,
                entity_id: self.entity_id_for_filtering.clone(),
            }),
        };
        self.services.parameter_store.update_config_for_layout_and_page_path(
            &layout.id,
            &self.segment,
            parameters,
        );
    }

    async fn update_data(&mut self) {
        self.update_periods();
        self.run_fetch_cycle().await;
    }

    /// Emit the default-window patch and adopt persisted periods when
    /// present.
    fn update_periods(&mut self) {
        let default_periods = vec![Period::default_window(self.today)];
        self.default_filter.push(FilterPatch {
            periods: Some(default_periods.clone()),
            ..Default::default()
        });
        self.periods = self
            .page_settings
            .periods
            .clone()
            .unwrap_or(default_periods);
    }

    /// One fetch cycle against the current layout and main period.
    ///
    /// A cycle that gets superseded by a newer period change is not
    /// cancelled; whichever completes last wins on the shared entity and
    /// relation fields.
    async fn run_fetch_cycle(&mut self) {
        let Some(layout) = self.layout.clone() else {
            return;
        };
        let Some(main_period) = self.periods.first().cloned() else {
            return;
        };

        self.request_status.begin_cycle();
        self.request_status.entities.is_error = false;
        self.request_status.relations.is_error = false;
        self.entities_for_filter = EntitySelectionView::default();

        let outcome = fetch::run_fetch_cycle(&self.services.entities, &layout.id, &main_period).await;

        match &outcome.entities {
            Some(entities) => {
                self.entities = entities.clone();
                self.required_entities = entity::filter_by_types(&self.entities, FILTERABLE_TYPES);
                self.init_entities_for_filter();
                self.update_optional_filter();
                self.request_status.entities.is_loading = false;
            }
            None => {
                // Loading intentionally stays true on error.
                self.request_status.entities.is_error = true;
            }
        }

        match &outcome.relations {
            Some(_) => self.request_status.relations.is_loading = false,
            None => self.request_status.relations.is_error = true,
        }

        if let (Some(entities), Some(relations)) = (&outcome.entities, &outcome.relations) {
            self.services.entities.init_entity_finder_store(entities, relations);
        }
    }

    /// Recompute the entity selection from fresh data and emit the entity
    /// default patch.
    fn init_entities_for_filter(&mut self) {
        let default_ids: Vec<EntityId> = self
            .required_entities
            .first()
            .map(|entity| vec![entity.id.clone()])
            .unwrap_or_default();
        self.default_filter.push(FilterPatch {
            entity: Some(EntitySlice {
                ids: default_ids,
                average: false,
            }),
            ..Default::default()
        });

        let in_memory_ids: Vec<EntityId> =
            self.selected_entities.iter().map(|e| e.id.clone()).collect();
        self.selected_entities = selection::resolve_selected_entities(
            self.page_settings.entities_ids.as_deref(),
            &in_memory_ids,
            &self.required_entities,
            self.config.max_selected_entity_count,
        );
        self.is_entities_average =
            selection::latch_average(self.is_entities_average, self.page_settings.entity_is_average);
        self.entities_for_filter = EntitySelectionView {
            average: self.is_entities_average,
            selected: self.selected_entities.iter().map(|e| e.id.clone()).collect(),
            list: entity::to_filter_entities(&self.required_entities),
        };
    }

    /// Recompute the cross-visitation selections and view, and emit the
    /// cross-visitation default patch.
    fn update_optional_filter(&mut self) {
        self.selected_entity_type = selection::resolve_selected_entity_type(
            &self.entities,
            self.selected_entity_type,
            self.lead_entity_type,
            self.page_settings.entity_type,
        );

        let (id, entity) = selection::resolve_filtering_entity(
            self.page_settings.entity_id.as_ref(),
            self.entity_id_for_filtering.as_ref(),
            &self.entities,
        );
        self.entity_id_for_filtering = id;
        self.entity_for_filtering = entity;

        let tenant_title = self
            .services
            .translate
            .get(&EntityType::Tenant.translate_key());
        self.default_filter.push(FilterPatch {
            cross_visitation: Some(CrossVisitationSlice {
                entity_type: Some(EntityType::Tenant),
                entity_id: None,
                entity_type_title: Some(tenant_title),
                entity_title: None,
            }),
            ..Default::default()
        });

        let translate = Arc::clone(&self.services.translate);
        self.cross_visitation_for_filter = CrossVisitationFilterView {
            entities: selection::cross_visitation_candidates(&self.entities),
            entity_types: selection::entity_type_options(&self.entities, |t| {
                translate.get(&t.translate_key())
            }),
            selected_type: self.selected_entity_type,
            selected_id: self.entity_id_for_filtering.clone(),
        };
    }

    /// (Re)subscribe the preset combiner for the current layout.
    fn init_presets(&mut self) {
        let Some(layout) = &self.layout else {
            return;
        };
        if let Some(previous) = self.preset_cancel.take() {
            previous.cancel();
        }
        let cancel = self.cancel.child_token();
        let presets_rx = self
            .services
            .filter_settings
            .filter_presets(&layout.id, &self.segment);
        spawn_preset_combiner(
            presets_rx,
            self.default_filter.subscribe(),
            self.preset_view_tx.clone(),
            cancel.clone(),
        );
        self.preset_cancel = Some(cancel);
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
