#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ControlId(u16);

impl ControlId {
    pub(crate) const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Children of a container share its thousands block.
    pub(crate) fn is_child_of(self, container: ControlId) -> bool {
        self != container && self.0 / 1000 == container.0 / 1000
    }
}

pub(crate) const BUTTON_RUN_SCRAPERS: ControlId = ControlId::new(1001);
pub(crate) const BUTTON_RUN_CLASSIFIERS: ControlId = ControlId::new(1002);
pub(crate) const LOG_SCRAPERS: ControlId = ControlId::new(1101);
pub(crate) const LOG_CLASSIFIERS: ControlId = ControlId::new(1102);

pub(crate) const PANEL_DASHBOARD: ControlId = ControlId::new(2000);
pub(crate) const LOADER_DASHBOARD: ControlId = ControlId::new(2001);
pub(crate) const PANEL_KPIS: ControlId = ControlId::new(2101);
pub(crate) const CHART_MEDIA: ControlId = ControlId::new(2201);
pub(crate) const CHART_CLASSIFICATION: ControlId = ControlId::new(2202);

pub(crate) const LOADER_QUERY: ControlId = ControlId::new(3001);
pub(crate) const LABEL_ANSWER: ControlId = ControlId::new(3101);
pub(crate) const PANEL_SOURCES: ControlId = ControlId::new(3102);
pub(crate) const LABEL_QUERY_ERROR: ControlId = ControlId::new(3201);
