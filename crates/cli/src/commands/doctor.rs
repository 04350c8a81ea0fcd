use serde::Serialize;
use vestia_core::config::{AppConfig, LoadOptions};
use vestia_db::repositories::{CatalogRepository, SqlCatalogRepository};
use vestia_db::{connect_with_settings, migrations};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

const DATABASE_CHECKS: [&str; 3] = ["database_connectivity", "schema_readiness", "catalog_size"];

pub fn run(json_output: bool) -> String {
    let report = build_report();

    if json_output {
        return serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed\",\"error\":\"{}\"}}",
                escape_json(&error.to_string())
            )
        });
    }

    render_human(&report)
}

fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.extend(check_database(&config));
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.extend(skipped(&DATABASE_CHECKS, "configuration did not load"));
        }
    }

    let all_pass = checks.iter().all(|check| check.status == CheckStatus::Pass);
    let overall_status = if all_pass { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_pass {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

/// Connects without migrating. A fresh database reports missing tables.
fn check_database(config: &AppConfig) -> Vec<DoctorCheck> {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            let mut checks = vec![DoctorCheck {
                name: "database_connectivity",
                status: CheckStatus::Fail,
                details: format!("failed to initialize async runtime: {error}"),
            }];
            checks.extend(skipped(&DATABASE_CHECKS[1..], "no async runtime"));
            return checks;
        }
    };

    runtime.block_on(async {
        let pool = match connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        {
            Ok(pool) => pool,
            Err(error) => {
                let mut checks = vec![DoctorCheck {
                    name: "database_connectivity",
                    status: CheckStatus::Fail,
                    details: format!("failed to connect to database: {error}"),
                }];
                checks.extend(skipped(&DATABASE_CHECKS[1..], "database is unreachable"));
                return checks;
            }
        };

        let mut checks = vec![DoctorCheck {
            name: "database_connectivity",
            status: CheckStatus::Pass,
            details: format!("connected using `{}`", config.database.url),
        }];

        let schema_ready = match migrations::missing_tables(&pool).await {
            Ok(missing) if missing.is_empty() => {
                checks.push(DoctorCheck {
                    name: "schema_readiness",
                    status: CheckStatus::Pass,
                    details: "all managed tables present".to_string(),
                });
                true
            }
            Ok(missing) => {
                checks.push(DoctorCheck {
                    name: "schema_readiness",
                    status: CheckStatus::Fail,
                    details: format!(
                        "missing tables: {} (run `vestia migrate`)",
                        missing.join(", ")
                    ),
                });
                false
            }
            Err(error) => {
                checks.push(DoctorCheck {
                    name: "schema_readiness",
                    status: CheckStatus::Fail,
                    details: error.to_string(),
                });
                false
            }
        };

        if schema_ready {
            let catalog = SqlCatalogRepository::new(pool.clone());
            checks.push(match catalog.count().await {
                Ok(count) => DoctorCheck {
                    name: "catalog_size",
                    status: CheckStatus::Pass,
                    details: format!("{count} products in catalog"),
                },
                Err(error) => DoctorCheck {
                    name: "catalog_size",
                    status: CheckStatus::Fail,
                    details: error.to_string(),
                },
            });
        } else {
            checks.extend(skipped(&DATABASE_CHECKS[2..], "schema is not ready"));
        }

        pool.close().await;
        checks
    })
}

fn skipped(names: &[&'static str], reason: &str) -> Vec<DoctorCheck> {
    names
        .iter()
        .map(|name| DoctorCheck {
            name: *name,
            status: CheckStatus::Skipped,
            details: format!("skipped because {reason}"),
        })
        .collect()
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = Vec::new();
    lines.push(report.summary.clone());

    for check in &report.checks {
        let marker = match check.status {
            CheckStatus::Pass => "ok",
            CheckStatus::Fail => "fail",
            CheckStatus::Skipped => "skip",
        };
        lines.push(format!("- [{marker}] {}: {}", check.name, check.details));
    }

    lines.join("\n")
}

fn escape_json(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
