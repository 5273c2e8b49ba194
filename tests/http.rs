use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const PERSON_NAME: &str = "Anna <Tester>";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: String,
    timestamp: String,
    person_name: String,
    uptime: f64,
}

#[derive(Debug, Deserialize)]
struct CounterPoint {
    key: String,
    days: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountersResponse {
    date: String,
    is_healthy: bool,
    counters: Vec<CounterPoint>,
    next_midnight_in_seconds: i64,
}

struct TestServer {
    base_url: String,
    assets_dir: PathBuf,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.assets_dir);
    }
}

static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::Mutex;
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PIDS: Mutex<Vec<i32>> = Mutex::new(Vec::new());

    pub fn register(pid: u32) {
        if let Ok(mut pids) = PIDS.lock() {
            pids.push(pid as i32);
        }
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
    }

    extern "C" fn on_exit() {
        if let Ok(pids) = PIDS.lock() {
            for &pid in pids.iter() {
                unsafe {
                    libc::kill(pid, libc::SIGTERM);
                }
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_assets_dir(label: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "health_counters_http_{label}_{}_{}",
        std::process::id(),
        nanos
    ));
    std::fs::create_dir_all(&path).expect("create assets dir");
    path
}

fn copy_public_assets(dir: &Path) {
    let public = Path::new(env!("CARGO_MANIFEST_DIR")).join("public");
    for name in ["index.html", "script.js", "styles.css"] {
        std::fs::copy(public.join(name), dir.join(name)).expect("copy asset");
    }
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(assets_dir: PathBuf, extra_env: &[(&str, &str)]) -> TestServer {
    let port = pick_free_port();
    let mut command = Command::new(env!("CARGO_BIN_EXE_health_counters"));
    command
        .env("PORT", port.to_string())
        .env("ASSETS_DIR", &assets_dir)
        .env("PERSON_NAME", PERSON_NAME)
        .env("HEALTHY_START_DATE", "2024-01-01")
        .env("DOCTOR_START_DATE", "2024-01-15")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    for (key, value) in extra_env {
        command.env(key, value);
    }
    let child = command.spawn().expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        assets_dir,
        child,
    }
}

/// Server with the bundled page, script and stylesheet but no avatar.
async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let dir = unique_assets_dir("shared");
    copy_public_assets(&dir);
    let server = Arc::new(spawn_server(dir, &[]).await);
    *guard = Some(Arc::clone(&server));
    server
}

#[tokio::test]
async fn http_health_reports_healthy() {
    let server = shared_server().await;
    let response = Client::new()
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: HealthResponse = response.json().await.unwrap();
    assert_eq!(body.status, "healthy");
    assert_eq!(body.person_name, PERSON_NAME);
    assert!(body.uptime >= 0.0);
    assert!(!body.timestamp.is_empty());
}

#[tokio::test]
async fn http_index_substitutes_placeholders() {
    let server = shared_server().await;
    let response = Client::new()
        .get(format!("{}/", server.base_url))
        .header("accept-language", "pl-PL,pl;q=0.9,en;q=0.5")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["cache-control"], "no-cache");

    let html = response.text().await.unwrap();
    assert!(html.contains("Anna &lt;Tester&gt;"));
    assert!(html.contains("<html lang=\"pl\">"));
    assert!(html.contains("2024-01-15"));
    assert!(!html.contains("{{PERSON_NAME}}"));
    assert!(!html.contains("{{HEALTHY_DAYS}}"));
}

#[tokio::test]
async fn http_script_is_javascript_with_config() {
    let server = shared_server().await;
    let response = Client::new()
        .get(format!("{}/script.js", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/javascript");

    let js = response.text().await.unwrap();
    assert!(js.contains("personName: 'Anna \\u003cTester>'"));
    assert!(js.contains("healthyStartDate: '2024-01-01'"));
    assert!(js.contains("healthStatus: 'healthy'"));
    assert!(!js.contains("{{"));
}

#[tokio::test]
async fn http_counters_are_non_negative() {
    let server = shared_server().await;
    let body: CountersResponse = Client::new()
        .get(format!("{}/api/counters", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(body.is_healthy);
    assert!(!body.date.is_empty());
    assert!(body.next_midnight_in_seconds > 0);
    assert_eq!(body.counters.len(), 2);
    let healthy = body.counters.iter().find(|c| c.key == "healthy").unwrap();
    let doctor = body.counters.iter().find(|c| c.key == "doctor").unwrap();
    assert_eq!(healthy.days, doctor.days + 14);
}

#[tokio::test]
async fn http_avatar_missing_is_404() {
    let server = shared_server().await;
    let response = Client::new()
        .get(format!("{}/avatar", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_static_assets_are_cached() {
    let server = shared_server().await;
    let response = Client::new()
        .get(format!("{}/styles.css", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["cache-control"], "public, max-age=3600");
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/css"));
}

#[tokio::test]
async fn http_unknown_path_gets_404_page() {
    let server = shared_server().await;
    let client = Client::new();
    for path in ["/does-not-exist", "/../Cargo.toml"] {
        let response = client
            .get(format!("{}{path}", server.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = response.text().await.unwrap();
        assert!(body.contains("404 - Page Not Found"));
    }
}

#[tokio::test]
async fn http_avatar_is_served_in_priority_order() {
    let dir = unique_assets_dir("avatar");
    std::fs::write(dir.join("avatar.svg"), "<svg xmlns=\"http://www.w3.org/2000/svg\"/>").unwrap();
    std::fs::write(dir.join("avatar.gif"), b"GIF89a").unwrap();
    let server = spawn_server(dir, &[]).await;

    let response = Client::new()
        .get(format!("{}/avatar", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/gif");
    assert_eq!(response.headers()["cache-control"], "public, max-age=3600");
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"GIF89a");
}

#[tokio::test]
async fn http_missing_templates_fail_with_500() {
    let dir = unique_assets_dir("empty");
    let server = spawn_server(dir, &[("IS_HEALTHY", "false")]).await;
    let client = Client::new();

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let script = client
        .get(format!("{}/script.js", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(script.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(script.text().await.unwrap().contains("Failed to load script"));

    // The process keeps serving after a failed request.
    let counters: CountersResponse = client
        .get(format!("{}/api/counters", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!counters.is_healthy);
}
