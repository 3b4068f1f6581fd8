use qa_reference::error::FetchError;
use qa_reference::infrastructure::{ManualClock, RawResponse, Transport};
use qa_reference::models::{Chapter, ContentFilter, ContentType, GroupFilter};
use qa_reference::pages::Route;
use qa_reference::services::{
    filter_questions, parse_math_text, CacheStore, DebouncedSearch, FetchOptions, Fetcher,
    MathSegment, MemoryCache, DEFAULT_CACHE_TTL,
};
use qa_reference::workflow::Resource;
use qa_reference::{App, Config, RunRequest};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_test::assert_ok;

const CHAPTER_PATH: &str = "/data/9/1.json";

const CHAPTER_JSON: &str = r#"{
    "chapter_no": 1,
    "name": "Introduction to Computers",
    "questions": [
        {
            "question_group": "Short Questions",
            "questions": [
                {"id": 1, "question": "What is HARDWARE?", "answer": "Physical parts of a computer", "content_type": "text"},
                {"id": 2, "question": "Solve $2x=4$", "answer": "$$x=2$$", "content_type": "math_problem"}
            ]
        },
        {
            "question_group": "Comparisons",
            "questions": [
                {"id": 1, "question": "Compare RAM and ROM", "answer": "See table", "content_type": "table",
                 "table_data": {"headers": ["RAM", "ROM"], "rows": [["Volatile", "Non-volatile"]]}},
                {"id": 2, "question": "Print hello", "answer": "Use print", "content_type": "programming",
                 "language": "python", "code": "print('hello')"}
            ]
        }
    ]
}"#;

/// 计数的内存传输通道：先依次返回预置响应，之后总是返回 `body`
struct CountingTransport {
    queued: Mutex<VecDeque<Result<RawResponse, FetchError>>>,
    body: String,
    calls: AtomicUsize,
}

impl CountingTransport {
    fn new(body: &str) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            body: body.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing_first(self, failures: usize) -> Self {
        {
            let mut queued = self.queued.lock().unwrap();
            for _ in 0..failures {
                queued.push_back(Err(FetchError::Network {
                    url: CHAPTER_PATH.to_string(),
                    message: "connection refused".to_string(),
                }));
            }
        }
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transport for CountingTransport {
    async fn get(&self, _path: &str) -> Result<RawResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(response) = self.queued.lock().unwrap().pop_front() {
            return response;
        }
        Ok(RawResponse::ok(self.body.clone()))
    }

    fn describe(&self) -> String {
        "counting".to_string()
    }
}

fn fetcher_with(
    transport: CountingTransport,
    retry_attempts: u32,
) -> (Fetcher<CountingTransport>, Arc<CountingTransport>, Arc<ManualClock>) {
    let transport = Arc::new(transport);
    let clock = Arc::new(ManualClock::new());
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new(DEFAULT_CACHE_TTL, clock.clone()));
    let options = FetchOptions {
        retry_attempts,
        ..FetchOptions::default()
    };
    (Fetcher::new(transport.clone(), cache, options), transport, clock)
}

fn sample_chapter() -> Chapter {
    serde_json::from_str(CHAPTER_JSON).unwrap()
}

fn write_fixture(root: &Path) {
    std::fs::create_dir_all(root.join("9")).unwrap();
    std::fs::write(root.join("9/index.json"), r#"["1.json"]"#).unwrap();
    std::fs::write(root.join("9/1.json"), CHAPTER_JSON).unwrap();
}

fn app_config(data_dir: &Path) -> Config {
    Config {
        data_dir: Some(data_dir.to_path_buf()),
        retry_attempts: 0,
        render_width: 40,
        ..Config::default()
    }
}

// ========== 筛选 ==========

#[test]
fn test_filter_by_table_yields_single_question() {
    let chapter = sample_chapter();
    let filtered = filter_questions(
        &chapter.questions,
        "",
        &ContentFilter::Only(ContentType::Table),
        &GroupFilter::All,
    );

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].question_group, "Comparisons");
    assert_eq!(filtered[0].questions.len(), 1);
    assert_eq!(filtered[0].questions[0].content_type(), Some(ContentType::Table));
}

#[test]
fn test_filter_properties() {
    let groups = sample_chapter().questions;

    // 默认条件不改变输入
    assert_eq!(
        filter_questions(&groups, "", &ContentFilter::All, &GroupFilter::All),
        groups
    );

    // 类型筛选后只剩该类型
    for kind in ContentType::ALL {
        let filtered = filter_questions(&groups, "", &ContentFilter::Only(kind), &GroupFilter::All);
        assert!(filtered
            .iter()
            .flat_map(|g| &g.questions)
            .all(|q| q.content_type() == Some(kind)));
        assert!(filtered.iter().all(|g| !g.questions.is_empty()));
    }

    // 搜索不区分大小写
    assert_eq!(
        filter_questions(&groups, "HARDWARE", &ContentFilter::All, &GroupFilter::All),
        filter_questions(&groups, "hardware", &ContentFilter::All, &GroupFilter::All)
    );

    // 没有匹配题目的分组不出现
    let filtered = filter_questions(&groups, "volatile", &ContentFilter::All, &GroupFilter::All);
    assert!(filtered.is_empty());
}

#[test]
fn test_math_text_segments() {
    assert_eq!(
        parse_math_text("a $x$ b $$y$$ c"),
        vec![
            MathSegment::Text("a ".into()),
            MathSegment::Inline("x".into()),
            MathSegment::Text(" b ".into()),
            MathSegment::Block("y".into()),
            MathSegment::Text(" c".into()),
        ]
    );
}

// ========== 缓存与重试 ==========

#[tokio::test]
async fn test_cache_ttl_controls_network_calls() {
    let (fetcher, transport, clock) = fetcher_with(CountingTransport::new(CHAPTER_JSON), 3);

    assert_ok!(fetcher.fetch(CHAPTER_PATH).await);
    assert_eq!(transport.calls(), 1);

    clock.advance(Duration::from_secs(299));
    assert_ok!(fetcher.fetch(CHAPTER_PATH).await);
    assert_eq!(transport.calls(), 1);

    clock.advance(Duration::from_secs(1));
    assert_ok!(fetcher.fetch(CHAPTER_PATH).await);
    assert_eq!(transport.calls(), 2);
    assert_eq!(fetcher.cache_size(), 1);

    fetcher.clear_cache();
    assert_eq!(fetcher.cache_size(), 0);
}

#[tokio::test]
async fn test_refetch_always_calls_network() {
    let (fetcher, transport, _clock) = fetcher_with(CountingTransport::new(CHAPTER_JSON), 3);
    let mut resource: Resource<_, Chapter> = Resource::new(fetcher);

    resource.set_key(Some(CHAPTER_PATH.to_string()));
    let state = resource.wait().await;
    assert_eq!(state.data.unwrap().name, "Introduction to Computers");

    for expected in 2..=4 {
        resource.refetch();
        let state = resource.wait().await;
        assert!(state.error.is_none());
        assert_eq!(transport.calls(), expected);
    }
}

#[tokio::test(start_paused = true)]
async fn test_retry_until_success() {
    let retry_attempts = 3;
    let (fetcher, transport, _clock) = fetcher_with(
        CountingTransport::new(CHAPTER_JSON).failing_first(retry_attempts as usize),
        retry_attempts,
    );

    let chapter = assert_ok!(fetcher.fetch_as::<Chapter>(CHAPTER_PATH).await);
    assert_eq!(chapter.chapter_no, 1);
    assert_eq!(transport.calls(), retry_attempts as usize + 1);
}

#[tokio::test(start_paused = true)]
async fn test_retry_exhaustion_surfaces_error() {
    let (fetcher, transport, _clock) =
        fetcher_with(CountingTransport::new(CHAPTER_JSON).failing_first(5), 2);
    let mut resource: Resource<_, Chapter> = Resource::new(fetcher);

    resource.set_key(Some(CHAPTER_PATH.to_string()));
    let state = resource.wait().await;

    assert!(!state.loading);
    assert!(state.data.is_none());
    assert!(state.error.unwrap().contains("connection refused"));
    assert_eq!(transport.calls(), 3);
}

// ========== 防抖 ==========

#[tokio::test(start_paused = true)]
async fn test_debounced_search_settles_on_last_value() {
    let mut search = DebouncedSearch::new(Duration::from_millis(300));
    for text in ["r", "ra", "ram"] {
        search.set(text);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert_eq!(search.search_value(), "ram");
    assert_eq!(search.debounced_value(), "");

    assert_eq!(search.changed().await, "ram");
}

// ========== 页面 ==========

#[tokio::test]
async fn test_app_renders_filtered_chapter_from_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let app = App::initialize(app_config(dir.path())).await.unwrap();

    let request = RunRequest {
        route: "/grade/9/1".to_string(),
        content: ContentFilter::Only(ContentType::Table),
        ..RunRequest::default()
    };
    let text = app.render_route(&Route::parse(&request.route), &request).await;

    assert!(text.contains("Introduction to Computers"));
    assert!(text.contains("4 questions available"));
    assert!(text.contains("## Comparisons"));
    assert!(text.contains("| Volatile | Non-volatile |"));
    assert!(!text.contains("## Short Questions"));
}

#[tokio::test]
async fn test_home_falls_back_to_builtin_grades() {
    let dir = tempfile::tempdir().unwrap();
    let app = App::initialize(app_config(dir.path())).await.unwrap();

    let text = app.render_route(&Route::Home, &RunRequest::default()).await;
    assert!(text.contains("Select Your Grade Level"));
    assert!(text.contains("Grade 9"));
    assert!(text.contains("Grade 10"));
}

#[tokio::test]
async fn test_grade_page_and_missing_chapter() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let app = App::initialize(app_config(dir.path())).await.unwrap();

    let grade = app
        .render_route(&Route::parse("/grade/9"), &RunRequest::default())
        .await;
    assert!(grade.contains("Chapter 1"));
    assert!(grade.contains("4 Questions"));

    let missing = app
        .render_route(&Route::parse("/grade/9/7"), &RunRequest::default())
        .await;
    assert!(missing.contains("HTTP 404"));
    assert!(missing.contains("Back to Grade 9"));
}

#[tokio::test]
async fn test_interactive_session_applies_commands() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let app = App::initialize(app_config(dir.path())).await.unwrap();

    let request = RunRequest {
        route: "/grade/9/1".to_string(),
        interactive: true,
        ..RunRequest::default()
    };
    let input: &[u8] = b":type programming\n:bogus\n:quit\n";
    let mut out = Vec::new();
    app.run_interactive(&request, input, &mut out).await.unwrap();

    let out = String::from_utf8(out).unwrap();
    let renders: Vec<&str> = out.split("← Back to Grade 9").skip(1).collect();
    assert_eq!(renders.len(), 2);
    assert!(renders[0].contains("## Short Questions"));
    assert!(!renders[1].contains("## Short Questions"));
    assert!(renders[1].contains("```python"));
}

#[tokio::test]
async fn test_interactive_back_renders_grade_page() {
    let dir = tempfile::tempdir().unwrap();
    write_fixture(dir.path());
    let app = App::initialize(app_config(dir.path())).await.unwrap();

    let request = RunRequest {
        route: "/grade/9/1".to_string(),
        interactive: true,
        ..RunRequest::default()
    };
    let input: &[u8] = b"hardware\n:back\n";
    let mut out = Vec::new();
    app.run_interactive(&request, input, &mut out).await.unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("Choose a subject to explore chapters"));
}
