//! Stage table and run parameters for the warehouse build stages.
//!
//! Each stage is one invocation of the dbt CLI against a named subset of
//! models. The table below is the single source of truth for the five
//! stages; everything else in the runner is shared.

use serde::Serialize;

use crate::host::HostContext;

/// Catalog used when the host supplies none.
pub const DEFAULT_CATALOG: &str = "streaming_dev";
/// Selector used for the test stage when the host supplies none.
pub const DEFAULT_SELECTOR: &str = "*";
/// dbt target environment used when the host supplies none.
pub const DEFAULT_TARGET: &str = "dev";

/// The five warehouse build stages.
///
/// Discriminant order matches [`STAGES`]; `config` relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Seed,
    Snapshot,
    RunSilver,
    RunGold,
    Test,
}

/// One row of the stage table: the dbt verb plus its selector policy.
#[derive(Debug, Clone, Copy)]
pub struct StageConfig {
    pub kind: StageKind,
    /// dbt subcommand to invoke.
    pub verb: &'static str,
    /// Selector baked into the stage template. `None` for snapshot (no
    /// `--select` at all) and for test (the selector comes from the host).
    pub fixed_selector: Option<&'static str>,
    /// True when the host must supply the selector (test stage).
    pub requires_selector: bool,
}

/// The full stage table, indexed by [`StageKind`] discriminant.
pub static STAGES: [StageConfig; 5] = [
    StageConfig {
        kind: StageKind::Seed,
        verb: "seed",
        fixed_selector: Some("raw_*"),
        requires_selector: false,
    },
    StageConfig {
        kind: StageKind::Snapshot,
        verb: "snapshot",
        fixed_selector: None,
        requires_selector: false,
    },
    StageConfig {
        kind: StageKind::RunSilver,
        verb: "run",
        fixed_selector: Some("020_silver"),
        requires_selector: false,
    },
    StageConfig {
        kind: StageKind::RunGold,
        verb: "run",
        fixed_selector: Some("030_gold"),
        requires_selector: false,
    },
    StageConfig {
        kind: StageKind::Test,
        verb: "test",
        fixed_selector: None,
        requires_selector: true,
    },
];

impl StageKind {
    /// Look up this stage's row in the table.
    pub fn config(self) -> &'static StageConfig {
        &STAGES[self as usize]
    }

    /// Line printed before anything else happens.
    pub fn start_message(self, params: &RunParameters) -> String {
        match self {
            StageKind::Seed => {
                format!("Starting dbt seed for catalog: {}", params.catalog)
            }
            StageKind::Snapshot => {
                format!("Starting dbt snapshot in catalog: {}", params.catalog)
            }
            StageKind::RunSilver => format!(
                "Starting dbt run for Silver layer in catalog: {}",
                params.catalog
            ),
            StageKind::RunGold => format!(
                "Starting dbt run for Gold layer in catalog: {}",
                params.catalog
            ),
            StageKind::Test => format!(
                "Starting dbt test for {} in catalog: {}",
                params.selector(),
                params.catalog
            ),
        }
    }

    /// Marker printed when the tool exits zero.
    pub fn success_marker(self, params: &RunParameters) -> String {
        match self {
            StageKind::Seed => "✅ dbt seed completed successfully".to_string(),
            StageKind::Snapshot => "✅ Snapshots created successfully".to_string(),
            StageKind::RunSilver => "✅ Silver layer built successfully".to_string(),
            StageKind::RunGold => "✅ Gold layer built successfully".to_string(),
            StageKind::Test => format!("✅ All tests passed for {}", params.selector()),
        }
    }

    /// Marker printed when the tool exits nonzero.
    pub fn failure_marker(self, params: &RunParameters) -> String {
        match self {
            StageKind::Seed => "❌ dbt seed failed".to_string(),
            StageKind::Snapshot => "❌ Snapshot creation failed".to_string(),
            StageKind::RunSilver => "❌ Silver layer build failed".to_string(),
            StageKind::RunGold => "❌ Gold layer build failed".to_string(),
            StageKind::Test => format!("❌ Some tests failed for {}", params.selector()),
        }
    }

    /// Message handed to the host's terminal-failure signal.
    pub fn failure_signal(self, params: &RunParameters) -> String {
        match self {
            StageKind::Seed => "dbt seed failed".to_string(),
            StageKind::Snapshot => "Snapshot failed".to_string(),
            StageKind::RunSilver => "Silver build failed".to_string(),
            StageKind::RunGold => "Gold build failed".to_string(),
            StageKind::Test => format!("Tests failed for {}", params.selector()),
        }
    }

    /// Label used in the `❌ Error running …:` containment line.
    pub fn error_label(self) -> &'static str {
        match self {
            StageKind::Seed => "dbt seed",
            StageKind::Snapshot => "dbt snapshot",
            StageKind::RunSilver | StageKind::RunGold => "dbt",
            StageKind::Test => "dbt test",
        }
    }
}

/// Parameters resolved from the host at the start of an invocation.
///
/// Absent parameters never fail; the documented defaults apply.
#[derive(Debug, Clone)]
pub struct RunParameters {
    pub catalog: String,
    pub selector: Option<String>,
    pub target: String,
}

impl RunParameters {
    /// Read the stage's parameters from the host, applying defaults.
    ///
    /// The selector is only consulted for stages that require one.
    pub fn resolve(config: &StageConfig, host: &dyn HostContext, target: &str) -> Self {
        let catalog = host.param("catalog", DEFAULT_CATALOG);
        let selector = config
            .requires_selector
            .then(|| host.param("select", DEFAULT_SELECTOR));
        Self {
            catalog,
            selector,
            target: target.to_string(),
        }
    }

    pub fn selector(&self) -> &str {
        self.selector.as_deref().unwrap_or(DEFAULT_SELECTOR)
    }
}
