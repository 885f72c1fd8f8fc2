use async_trait::async_trait;
use regex::Regex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vendor_scout::{App, CapabilityClient, Config, GenerateRequest, ServiceError};

/// 按 prompt 内容分派的模拟客户端
struct MockClient {
    /// 所有类别的首次查找都返回同一批名称
    shared_names: bool,
    fail_disambiguation: bool,
    fail_research: bool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    research_calls: AtomicUsize,
    count_re: Regex,
    category_re: Regex,
    vendor_re: Regex,
}

impl MockClient {
    fn new() -> Self {
        Self {
            shared_names: false,
            fail_disambiguation: false,
            fail_research: false,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            research_calls: AtomicUsize::new(0),
            count_re: Regex::new(r"exactly (\d+) real").unwrap(),
            category_re: Regex::new(r#"vendors that are (.+?)s in the "(.+?)" industry"#).unwrap(),
            vendor_re: Regex::new(r#"detailed information about "(.+?)""#).unwrap(),
        }
    }

    fn failure(&self, message: &str) -> ServiceError {
        ServiceError::ApiCallFailed {
            model: "mock".to_string(),
            message: message.to_string(),
        }
    }

    fn discovery_reply(&self, prompt: &str) -> String {
        let count: usize = self.count_re.captures(prompt).unwrap()[1].parse().unwrap();
        let caps = self.category_re.captures(prompt).unwrap();
        let category = caps[1].to_string();
        let alternative = caps[2].contains("alternative");

        let names: Vec<String> = (1..=count)
            .map(|i| {
                if alternative {
                    format!("{} Alt {}", category, i)
                } else if self.shared_names {
                    format!("Shared Vendor {}", i)
                } else {
                    format!("{} Vendor {}", category, i)
                }
            })
            .collect();
        format!("```json\n{}\n```", serde_json::to_string(&names).unwrap())
    }

    async fn research_reply(&self, prompt: &str) -> Result<String, ServiceError> {
        self.research_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_research {
            return Err(self.failure("research unavailable"));
        }

        let name = self.vendor_re.captures(prompt).unwrap()[1].to_string();
        let score = (name.len() % 10) + 1;
        Ok(serde_json::json!({
            "description": format!("{} makes things", name),
            "website": "https://vendor.example",
            "contact": "hello@vendor.example",
            "specializations": ["solar"],
            "relevance_score": score,
        })
        .to_string())
    }
}

#[async_trait]
impl CapabilityClient for MockClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, ServiceError> {
        let prompt = request.prompt.as_str();
        if prompt.contains("different interpretations") {
            if self.fail_disambiguation {
                return Err(self.failure("disambiguation unavailable"));
            }
            Ok(r#"[{"interpretation": "solar panels", "description": "Photovoltaic modules"}]"#
                .to_string())
        } else if prompt.contains("real, existing vendors") {
            Ok(self.discovery_reply(prompt))
        } else if prompt.contains("detailed information about") {
            self.research_reply(prompt).await
        } else {
            Err(self.failure("unexpected prompt"))
        }
    }
}

fn test_config(output_name: &str) -> Config {
    let output = std::env::temp_dir().join(format!(
        "vendor_scout_{}_{}.json",
        output_name,
        std::process::id()
    ));
    Config {
        llm_api_key: "sk-test".to_string(),
        max_retries: 1,
        initial_backoff_ms: 1,
        discovery_pause_ms: 1,
        enrichment_pause_ms: 1,
        enrichment_concurrency: 4,
        vendor_count: 20,
        output_file: output.display().to_string(),
        ..Config::default()
    }
}

#[tokio::test]
async fn full_run_writes_sorted_records() {
    let config = test_config("full_run");
    let output = config.output_file.clone();
    let client = Arc::new(MockClient::new());
    let app = App::with_client(config, client.clone());

    let summary = app.run("solar").await.unwrap();

    assert_eq!(summary.interpretation.interpretation, "solar panels");
    assert_eq!(summary.discovered, 20);
    assert_eq!(summary.records.len(), 20);
    assert_eq!(summary.success, 20);
    assert_eq!(summary.fallback, 0);
    assert!(summary
        .records
        .windows(2)
        .all(|w| w[0].relevance_score >= w[1].relevance_score));

    let manufacturers = summary
        .records
        .iter()
        .filter(|r| r.category == "manufacturer")
        .count();
    assert_eq!(manufacturers, 8);

    let written = tokio::fs::read_to_string(&output).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 20);
    let _ = tokio::fs::remove_file(&output).await;
}

#[tokio::test]
async fn concurrent_categories_never_share_a_name() {
    let mut config = test_config("shared");
    config.output_file = String::new();
    let client = Arc::new(MockClient {
        shared_names: true,
        ..MockClient::new()
    });
    let app = App::with_client(config, client);

    let summary = app.run("solar").await.unwrap();

    let names: HashSet<&str> = summary.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names.len(), summary.records.len());
    assert_eq!(summary.records.len(), 20);
    assert!(names.iter().any(|n| n.contains("Alt")));
}

#[tokio::test]
async fn failing_research_keeps_cardinality_with_fallbacks() {
    let mut config = test_config("fallback");
    config.output_file = String::new();
    let client = Arc::new(MockClient {
        fail_research: true,
        ..MockClient::new()
    });
    let app = App::with_client(config, client.clone());

    let summary = app.run("solar").await.unwrap();

    assert_eq!(summary.records.len(), 20);
    assert_eq!(summary.fallback, 20);
    for record in &summary.records {
        assert_eq!(record.relevance_score, 5);
        assert_eq!(record.specializations, vec!["solar panels".to_string()]);
        assert_eq!(
            record.website,
            format!("https://www.{}.com", record.name.to_lowercase().replace(' ', ""))
        );
    }
    // 每个供应商 1 次调用 + 1 次重试
    assert_eq!(client.research_calls.load(Ordering::SeqCst), 40);
}

#[tokio::test]
async fn enrichment_respects_concurrency_limit() {
    let mut config = test_config("limit");
    config.output_file = String::new();
    config.enrichment_concurrency = 3;
    let client = Arc::new(MockClient::new());
    let app = App::with_client(config, client.clone());

    app.run("solar").await.unwrap();

    let max = client.max_in_flight.load(Ordering::SeqCst);
    assert!(max <= 3, "max in flight was {}", max);
    assert!(max >= 1);
}

#[tokio::test]
async fn disambiguation_failure_falls_back_to_raw_term() {
    let mut config = test_config("disambiguation");
    config.output_file = String::new();
    config.vendor_count = 5;
    let client = Arc::new(MockClient {
        fail_disambiguation: true,
        ..MockClient::new()
    });
    let app = App::with_client(config, client);

    let summary = app.run("solar").await.unwrap();

    assert_eq!(summary.interpretation.interpretation, "solar");
    assert_eq!(summary.records.len(), 5);
}

#[tokio::test]
async fn second_run_does_not_rediscover_names() {
    let mut config = test_config("rerun");
    config.output_file = String::new();
    config.vendor_count = 5;
    let app = App::with_client(config, Arc::new(MockClient::new()));

    let first = app.run("solar").await.unwrap();
    let second = app.run("solar").await.unwrap();

    let first_names: HashSet<&str> = first.records.iter().map(|r| r.name.as_str()).collect();
    assert!(!second.records.is_empty());
    assert!(second
        .records
        .iter()
        .all(|r| !first_names.contains(r.name.as_str())));
}
