//! End-to-end integration tests for the BRX runtime.
//!
//! These tests drive the full path from user input to report: keyword
//! analysis, tool planning, the convergence loop over the real tool
//! registry, ledger recording and community tool submissions.

use std::sync::{Arc, Mutex};
use std::thread;

use brx_agent::{
    ConvergenceLoop, ExecutionResult, QualityPolicy, Runtime, SimulatedInvoker, Stage,
    ThinkingPipeline, ToolInvoker, ToolOutcome,
};
use brx_config::AppConfig;
use brx_core::event::DomainEvent;
use brx_core::request::{Exchange, Request};
use brx_security::ToolMetadata;
use brx_telemetry::{
    ArchitectureExpansion, ExpansionSnapshot, ImprovementEvent, Ledger, LedgerStatus, VersionLabel,
};

// ── Helpers ──────────────────────────────────────────────────────────────

fn runtime() -> Runtime {
    Runtime::from_config(&AppConfig::default()).unwrap()
}

fn runtime_with(configure: impl FnOnce(&mut AppConfig)) -> Runtime {
    let mut config = AppConfig::default();
    configure(&mut config);
    Runtime::from_config(&config).unwrap()
}

/// A ledger fake that keeps every event it is handed.
#[derive(Default)]
struct FakeLedger {
    events: Mutex<Vec<ImprovementEvent>>,
    expansions: Mutex<Vec<ArchitectureExpansion>>,
}

impl Ledger for FakeLedger {
    fn record(&self, event: ImprovementEvent) -> VersionLabel {
        let mut events = self.events.lock().unwrap();
        events.push(event);
        VersionLabel(format!("test-{}", events.len()))
    }

    fn status(&self) -> LedgerStatus {
        let recorded = self.events.lock().unwrap().len() as u64;
        LedgerStatus {
            symbolic_version: "test".into(),
            internal_build: 1 + recorded,
            improvements: recorded,
            hours_since_creation: 0.0,
            improvements_per_hour: 0.0,
            evolution_events: self.expansions.lock().unwrap().len(),
            motto: String::new(),
        }
    }

    fn expand_architecture(&self, expansion: ArchitectureExpansion) -> ExpansionSnapshot {
        let snapshot = ExpansionSnapshot {
            previous_build: 0,
            new_tools_added: expansion.new_tools,
            new_thinking_layers: expansion.new_layers,
            memory_expansion: expansion.memory_growth,
            timestamp: chrono::Utc::now(),
        };
        self.expansions.lock().unwrap().push(expansion);
        snapshot
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Request processing
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn e2e_professional_image_request() {
    let rt = runtime();
    let report = rt
        .process_request("crie uma imagem profissional", "ana")
        .unwrap();

    assert_eq!(report.user_input, "crie uma imagem profissional");
    assert_eq!(report.user_id, "ana");
    assert_eq!(report.tools_used(), vec!["image_generation"]);

    let ToolOutcome::Completed(output) = &report.tool_results[0].outcome else {
        panic!("image generation should succeed");
    };
    assert_eq!(output.extra["resolution"], "512x512");
    assert_eq!(output.extra["style"], "basic");

    let lexical = &report
        .thinking_process
        .get(Stage::LexicalAnalysis)
        .unwrap()
        .payload;
    let intents = lexical["intents"].as_array().unwrap();
    assert!(intents.contains(&serde_json::json!("creation")));
    assert!(intents.contains(&serde_json::json!("visual")));

    let context = &report
        .thinking_process
        .get(Stage::ContextEnrichment)
        .unwrap()
        .payload;
    assert_eq!(context["primary_domain"], "art");
    assert_eq!(context["summary"], "Domain: art");
    assert!(
        context["implicit_requirements"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("high_quality"))
    );
}

#[test]
fn e2e_empty_input_is_handled() {
    let report = runtime().process_request("", "anonymous").unwrap();

    let lexical = &report
        .thinking_process
        .get(Stage::LexicalAnalysis)
        .unwrap()
        .payload;
    assert_eq!(lexical["tokens"], 0);
    assert_eq!(lexical["sentences"], 1);
    assert_eq!(lexical["complexity_score"], 0.0);
    assert_eq!(report.tools_used(), vec!["text_generation"]);
    assert_eq!(report.primary_result(), Some("Text generated: "));
}

#[test]
fn e2e_multi_tool_plan_runs_in_priority_order() {
    let report = runtime()
        .process_request("buscar exemplos e escrever o código do app", "dev")
        .unwrap();
    assert_eq!(
        report.tools_used(),
        vec!["code_generation", "text_generation", "web_research"]
    );

    let strategy = &report
        .thinking_process
        .get(Stage::ToolStrategy)
        .unwrap()
        .payload;
    assert_eq!(strategy["integration_strategy"], "sequential");
}

#[test]
fn e2e_registry_confidence_converges_through_boost() {
    // skill 0.7 → qualities 0.7, 0.8, 0.9, 1.0
    let report = runtime().process_request("escrever um texto", "u").unwrap();
    assert_eq!(report.quality_metrics.iterations, 4);
    assert_eq!(report.quality_metrics.final_quality, 1.0);
    assert!(report.quality_metrics.threshold_met);

    let execution = &report.thinking_process.get(Stage::Execution).unwrap().payload;
    assert_eq!(execution["iteration_history"].as_array().unwrap().len(), 4);
    assert_eq!(execution["quality_threshold_met"], true);
}

#[test]
fn e2e_higher_skill_converges_sooner() {
    let rt = runtime_with(|c| c.tools.base_skill_level = 0.96);
    let report = rt.process_request("escrever", "u").unwrap();
    assert_eq!(report.quality_metrics.iterations, 1);
}

#[test]
fn e2e_configured_policy_bounds_iterations() {
    let rt = runtime_with(|c| {
        c.pipeline.quality_threshold = 1.0;
        c.pipeline.max_iterations = 2;
    });
    let report = rt.process_request("escrever", "u").unwrap();
    assert_eq!(report.quality_metrics.iterations, 2);
    assert!(!report.quality_metrics.threshold_met);
}

#[test]
fn e2e_report_serializes_to_json() {
    let report = runtime().process_request("fazer um desenho", "u").unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["user_id"], "u");
    assert_eq!(json["tool_results"][0]["tool"], "image_generation");
    assert_eq!(json["tool_results"][0]["status"], "completed");
    assert_eq!(json["thinking_process"].as_array().unwrap().len(), 5);
    assert_eq!(json["system_info"]["version"], "BRX ∞");
    assert!(json["quality_metrics"]["processing_time_secs"].is_number());
}

// ═════════════════════════════════════════════════════════════════════════
// Ledger and status
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn e2e_each_run_is_recorded_with_its_quality() {
    let ledger = Arc::new(FakeLedger::default());
    let rt = runtime().with_ledger(ledger.clone());

    let first = rt.process_request("escrever um documento", "a").unwrap();
    rt.process_request("buscar referências", "b").unwrap();

    let events = ledger.events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.kind == "user_interaction"));
    assert_eq!(events[0].significance, first.quality_metrics.final_quality);
    assert_eq!(events[1].description, "Processed: buscar referências...");
    assert_eq!(first.system_info.version_label, "test-1");
}

#[test]
fn e2e_fake_ledger_status_returns_after_record() {
    let ledger = Arc::new(FakeLedger::default());
    ledger.record(ImprovementEvent::new("user_interaction", 0.9, "x"));

    let (tx, rx) = std::sync::mpsc::channel();
    let worker = Arc::clone(&ledger);
    thread::spawn(move || {
        let _ = tx.send(worker.status());
    });

    let status = rx
        .recv_timeout(std::time::Duration::from_secs(3))
        .expect("ledger status should not block");
    assert_eq!(status.internal_build, 2);
    assert_eq!(status.improvements, 1);
}

#[test]
fn e2e_status_reflects_activity() {
    let rt = runtime();
    rt.process_request("oi", "a").unwrap();
    rt.process_request("olá", "b").unwrap();

    let status = rt.system_status();
    assert_eq!(status.ledger.symbolic_version, "BRX ∞");
    assert_eq!(status.ledger.internal_build, 3);
    assert_eq!(status.ledger.improvements, 2);
    assert_eq!(status.total_base_tools, 4);
    assert_eq!(status.active_sessions, 2);
}

#[test]
fn e2e_concurrent_requests_share_counters_safely() {
    let rt = Arc::new(runtime());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let rt = Arc::clone(&rt);
            thread::spawn(move || {
                for _ in 0..5 {
                    rt.process_request("escrever um texto", &format!("user-{i}"))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let status = rt.system_status();
    assert_eq!(status.ledger.improvements, 40);
    assert_eq!(status.ledger.internal_build, 41);
    assert_eq!(status.active_sessions, 8);
    // four iterations per request
    assert_eq!(rt.registry().usage_count("text_generation"), Some(160));
}

// ═════════════════════════════════════════════════════════════════════════
// Community submissions
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn e2e_approved_tool_is_usable_in_registry() {
    let rt = runtime();
    let outcome = rt.submit_tool(
        "maria",
        "def traduzir(texto):\n    return texto[::-1]",
        ToolMetadata::new("tradutor", "Traduz textos"),
    );
    assert!(outcome.is_approved());
    assert_eq!(outcome.tool_id().len(), 8);

    let output = rt.registry().execute("tradutor", "olá").unwrap();
    assert_eq!(output.result, "Community tool tradutor executed: olá");
    assert_eq!(output.extra["creator"], "maria");

    let stats = rt.system_status().community_stats;
    assert_eq!(stats.total_tools, 1);
    assert_eq!(stats.integrated_tools[outcome.tool_id()].creator, "maria");
}

#[test]
fn e2e_dangerous_tool_is_rejected_with_issues() {
    let rt = runtime();
    let outcome = rt.submit_tool(
        "mallory",
        "import subprocess\nsubprocess.run(['rm', '-rf', '/'])\neval(x)",
        ToolMetadata::new("cleanup", "Totally safe"),
    );

    let brx_security::SubmissionOutcome::Rejected { issues, .. } = outcome else {
        panic!("submission should be rejected");
    };
    assert!(issues.contains(&"Dangerous pattern detected: subprocess".to_string()));
    assert!(issues.contains(&"Dangerous pattern detected: eval(".to_string()));
    assert!(!rt.registry().contains("cleanup"));
    assert_eq!(rt.system_status().community_stats.pending_approval, 1);
}

#[test]
fn e2e_submission_expands_architecture() {
    let ledger = Arc::new(FakeLedger::default());
    let rt = runtime().with_ledger(ledger.clone());
    rt.submit_tool("dev", "pass", ToolMetadata::new("noop", ""));

    let expansions = ledger.expansions.lock().unwrap();
    assert_eq!(expansions.len(), 1);
    assert_eq!(expansions[0].new_tools, 1);
    assert_eq!(expansions[0].memory_growth, 4);
}

#[tokio::test]
async fn e2e_events_are_published() {
    let rt = runtime();
    let mut rx = rt.event_bus().subscribe();

    rt.submit_tool("dev", "pass", ToolMetadata::new("noop", ""));
    rt.process_request("escrever", "dev").unwrap();

    let mut kinds = Vec::new();
    while let Ok(event) = rx.try_recv() {
        kinds.push(match event.as_ref() {
            DomainEvent::SubmissionScreened { approved, .. } => {
                assert!(approved);
                "screened"
            }
            DomainEvent::ToolExecuted { success, .. } => {
                assert!(success);
                "tool"
            }
            DomainEvent::PipelineCompleted { .. } => "completed",
            DomainEvent::EvolutionTick { .. } => "tick",
        });
    }
    assert_eq!(kinds, vec!["screened", "tool", "completed"]);
}

// ═════════════════════════════════════════════════════════════════════════
// Pipeline in isolation
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn e2e_pipeline_is_idempotent_per_request() {
    let pipeline = ThinkingPipeline::default();
    let request = Request::new("analisar dados e criar um programa rápido")
        .with_history(vec![Exchange::new("oi", "olá")]);

    let a = pipeline.process(&request, &SimulatedInvoker).unwrap();
    let b = pipeline.process(&request, &SimulatedInvoker).unwrap();
    assert_eq!(a.trace, b.trace);
    assert_eq!(a.plan, b.plan);
    assert_eq!(a.outcome.iteration_history, b.outcome.iteration_history);
}

/// Scores below threshold on every attempt except the first.
struct FrontLoaded;

impl ToolInvoker for FrontLoaded {
    fn invoke(&self, tools: &[String], _text: &str, attempt: u32) -> ExecutionResult {
        ExecutionResult {
            tools_executed: tools.to_vec(),
            attempt,
            result: String::new(),
            confidence: if attempt == 0 { 0.9 } else { 0.0 },
            entries: Vec::new(),
        }
    }
}

#[test]
fn e2e_running_best_decides_termination() {
    let tools = vec!["text_generation".to_string()];

    // 0.9 meets 0.85 immediately
    let policy = QualityPolicy::new(0.85, 5).unwrap();
    let outcome = ConvergenceLoop::new(&FrontLoaded)
        .run(&tools, "x", &policy)
        .unwrap();
    assert_eq!(outcome.iterations, 1);

    // 0.9, 0.1, 0.2, 0.3, 0.4: best stays the first attempt
    let policy = QualityPolicy::new(0.95, 5).unwrap();
    let outcome = ConvergenceLoop::new(&FrontLoaded)
        .run(&tools, "x", &policy)
        .unwrap();
    assert_eq!(outcome.iterations, 5);
    assert_eq!(outcome.best_result.unwrap().attempt, 0);
    assert!((outcome.final_quality - 0.9).abs() < 1e-12);
}

// ═════════════════════════════════════════════════════════════════════════
// Configuration
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn e2e_env_overrides_reach_the_runtime() {
    let mut config = AppConfig::default();
    config
        .apply_env_overrides(|key| match key {
            "BRX_INVOKER" => Some("simulated".into()),
            "BRX_MAX_ITERATIONS" => Some("1".into()),
            _ => None,
        })
        .unwrap();
    config.validate().unwrap();

    let rt = Runtime::from_config(&config).unwrap();
    let report = rt.process_request("escrever", "u").unwrap();
    assert_eq!(report.quality_metrics.iterations, 1);
    // simulated runs still report the planned tool
    assert_eq!(report.tools_used(), vec!["text_generation"]);
}

#[test]
fn e2e_default_toml_round_trips_into_a_runtime() {
    let config: AppConfig = toml_from_default();
    assert!(Runtime::from_config(&config).is_ok());
}

fn toml_from_default() -> AppConfig {
    let dir = std::env::temp_dir().join(format!("brx-e2e-{}", std::process::id()));
    let path = dir.join("config.toml");
    let _ = std::fs::remove_file(&path);
    assert!(AppConfig::write_default(&path).unwrap());
    let config = AppConfig::load_from(&path).unwrap();
    let _ = std::fs::remove_dir_all(&dir);
    config
}
