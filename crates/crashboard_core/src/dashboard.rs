//! Dashboard controller: one statistics fetch, three independent projections.
use std::fmt;

use crate::Effect;

pub const ERROR_HEADING: &str = "Error al cargar las estadísticas";
pub const ERROR_BODY: &str =
    "No se pudieron obtener los datos del servidor. Por favor, inténtelo de nuevo más tarde.";

pub const MEDIA_DATASET_LABEL: &str = "Total de Noticias";
pub const CLASSIFICATION_LABELS: [&str; 3] = ["Accidentes", "No Accidentes", "Sin Clasificar"];

const MEDIA_COLOR: Color = Color::rgba(54, 162, 235, 60);
const CLASSIFICATION_COLORS: [Color; 3] = [
    Color::rgba(255, 99, 132, 70),
    Color::rgba(75, 192, 192, 70),
    Color::rgba(201, 203, 207, 70),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneralStats {
    pub total: u64,
    pub accidentes: u64,
    pub no_accidentes: u64,
    pub sin_clasificar: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MediumStats {
    pub total_noticias: u64,
}

/// Statistics as received; `by_medium` keeps the server's key order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatisticsSnapshot {
    pub general: GeneralStats,
    pub by_medium: Vec<(String, MediumStats)>,
}

/// An sRGB colour with alpha in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha_pct: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, alpha_pct: u8) -> Self {
        Self { r, g, b, alpha_pct }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            f64::from(self.alpha_pct) / 100.0
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Doughnut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartView {
    pub kind: ChartKind,
    pub dataset_label: Option<&'static str>,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    /// One colour for the whole dataset, or one per label.
    pub colors: Vec<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiView {
    pub id: &'static str,
    pub label: &'static str,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DashboardView {
    #[default]
    Closed,
    Loading,
    Ready {
        kpis: Vec<KpiView>,
        media_chart: ChartView,
        classification_chart: ChartView,
    },
    /// Replaces everything else on the page.
    Failed {
        heading: &'static str,
        body: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct DashboardController {
    view: DashboardView,
}

impl DashboardController {
    /// Only the first open fetches; a failure is terminal for the session.
    pub(crate) fn open(&mut self) -> Option<Effect> {
        if self.view != DashboardView::Closed {
            return None;
        }
        self.view = DashboardView::Loading;
        Some(Effect::FetchStatistics)
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.view == DashboardView::Loading
    }

    pub(crate) fn loaded(&mut self, snapshot: &StatisticsSnapshot) -> bool {
        if !self.is_loading() {
            return false;
        }
        self.view = DashboardView::Ready {
            kpis: kpis(&snapshot.general),
            media_chart: media_chart(&snapshot.by_medium),
            classification_chart: classification_chart(&snapshot.general),
        };
        true
    }

    pub(crate) fn failed(&mut self) -> bool {
        if !self.is_loading() {
            return false;
        }
        self.view = DashboardView::Failed {
            heading: ERROR_HEADING,
            body: ERROR_BODY,
        };
        true
    }

    pub(crate) fn view(&self) -> DashboardView {
        self.view.clone()
    }
}

fn kpis(general: &GeneralStats) -> Vec<KpiView> {
    vec![
        KpiView {
            id: "kpi-total-noticias",
            label: "Total de Noticias",
            value: general.total,
        },
        KpiView {
            id: "kpi-accidentes",
            label: "Accidentes",
            value: general.accidentes,
        },
        KpiView {
            id: "kpi-no-accidentes",
            label: "No Accidentes",
            value: general.no_accidentes,
        },
        KpiView {
            id: "kpi-sin-clasificar",
            label: "Sin Clasificar",
            value: general.sin_clasificar,
        },
    ]
}

fn media_chart(by_medium: &[(String, MediumStats)]) -> ChartView {
    ChartView {
        kind: ChartKind::Bar,
        dataset_label: Some(MEDIA_DATASET_LABEL),
        labels: by_medium.iter().map(|(name, _)| name.clone()).collect(),
        values: by_medium.iter().map(|(_, stats)| stats.total_noticias).collect(),
        colors: vec![MEDIA_COLOR],
    }
}

fn classification_chart(general: &GeneralStats) -> ChartView {
    ChartView {
        kind: ChartKind::Doughnut,
        dataset_label: None,
        labels: CLASSIFICATION_LABELS.iter().map(|s| s.to_string()).collect(),
        values: vec![general.accidentes, general.no_accidentes, general.sin_clasificar],
        colors: CLASSIFICATION_COLORS.to_vec(),
    }
}
