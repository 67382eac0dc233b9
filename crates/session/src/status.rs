//! Loading/error tracking for the page's parameter requests.

use serde::Serialize;

/// Flags of one request domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RequestStatus {
    pub is_loading: bool,
    pub is_error: bool,
}

/// Per-domain request status: the entities+mapping group and the relations
/// group fail and settle independently.
///
/// On failure the error flag is set while the loading flag intentionally
/// stays true; it is only cleared by a successful completion. Callers that
/// need "settled" must check both flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ParamRequestStatus {
    pub entities: RequestStatus,
    pub relations: RequestStatus,
}

impl ParamRequestStatus {
    /// Mark both domains loading at the start of a fetch cycle.
    pub fn begin_cycle(&mut self) {
        self.entities.is_loading = true;
        self.relations.is_loading = true;
    }

    /// True while either domain is still loading.
    pub fn is_loading(&self) -> bool {
        self.entities.is_loading || self.relations.is_loading
    }

    /// True when either domain has failed.
    pub fn is_error(&self) -> bool {
        self.entities.is_error || self.relations.is_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregates_are_ors_over_domains() {
        let mut status = ParamRequestStatus::default();
        assert!(!status.is_loading());
        assert!(!status.is_error());

        status.begin_cycle();
        assert!(status.is_loading());

        status.entities.is_loading = false;
        assert!(status.is_loading());

        status.relations.is_error = true;
        assert!(status.is_error());
    }
}
