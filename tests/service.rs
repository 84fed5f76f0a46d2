use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use greetd::middleware::{AccessLog, RequestId, WriterSink};
use greetd::{Method, Readiness, Request, Router, Server, app};

/// In-memory log destination that the test keeps a handle to.
#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes).lines().map(str::to_owned).collect()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn fixed_app(readiness: Readiness, log: SharedBuf) -> Router {
    app::router(
        readiness,
        RequestId::new(|| "111111".to_owned()),
        AccessLog::new(WriterSink::new(log)),
    )
}

fn get(path: &str) -> Request {
    Request::new(Method::Get, path)
}

#[tokio::test]
async fn healthz_follows_readiness() {
    let readiness = Readiness::new();
    let app = fixed_app(readiness.clone(), SharedBuf::default());

    for _ in 0..3 {
        let res = app.dispatch(get("/healthz")).await;
        assert_eq!(res.status_code(), 503);
        assert!(res.body().is_empty());
    }

    readiness.set_ready();
    for _ in 0..3 {
        let res = app.dispatch(get("/healthz")).await;
        assert_eq!(res.status_code(), 200);
        assert!(res.body().is_empty());
    }
}

#[tokio::test]
async fn index_follows_readiness() {
    let readiness = Readiness::new();
    let app = fixed_app(readiness.clone(), SharedBuf::default());

    let res = app.dispatch(get("/")).await;
    assert_eq!(res.status_code(), 500);
    assert_eq!(res.body(), b"Not ready yet, World!");

    readiness.set_ready();
    let res = app.dispatch(get("/")).await;
    assert_eq!(res.status_code(), 200);
    assert_eq!(res.body(), b"Hello, World!");

    readiness.set_not_ready();
    readiness.set_ready();
    let res = app.dispatch(get("/")).await;
    assert_eq!(res.status_code(), 500);
}

#[tokio::test]
async fn fixed_id_reaches_header_and_log() {
    let log = SharedBuf::default();
    let app = fixed_app(Readiness::new(), log.clone());

    let res = app.dispatch(get("/")).await;
    assert_eq!(res.header("X-Request-Id"), Some("111111"));

    let lines = log.lines();
    assert_eq!(lines.len(), 1);

    let tokens: Vec<&str> = lines[0].split_whitespace().collect();
    let get_at = tokens.iter().position(|t| *t == "GET").expect("method token");
    assert_eq!(tokens[get_at - 1], "111111");
    assert_eq!(tokens[get_at + 1], "/");

    let elapsed = tokens[get_at - 2].strip_suffix("us").expect("duration token");
    assert!(elapsed.parse::<u64>().is_ok(), "{elapsed}");
    assert_eq!(tokens[get_at - 3], "500");
}

#[tokio::test]
async fn unknown_routes() {
    let app = fixed_app(Readiness::new(), SharedBuf::default());

    assert_eq!(app.dispatch(get("/nope")).await.status_code(), 404);
    let res = app.dispatch(Request::new(Method::Post, "/")).await;
    assert_eq!(res.status_code(), 405);
}

#[tokio::test]
async fn concurrent_requests_get_distinct_ids_and_one_line_each() {
    const N: usize = 64;

    let log = SharedBuf::default();
    let readiness = Readiness::new();
    readiness.set_ready();
    let counter = Arc::new(AtomicUsize::new(0));
    let ids = Arc::clone(&counter);
    let app = Arc::new(app::router(
        readiness,
        RequestId::new(move || format!("req-{}", ids.fetch_add(1, Ordering::SeqCst))),
        AccessLog::new(WriterSink::new(log.clone())),
    ));

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..N {
        let app = Arc::clone(&app);
        tasks.spawn(async move {
            let res = app.dispatch(get("/")).await;
            res.header("x-request-id").map(str::to_owned)
        });
    }

    let mut header_ids = HashSet::new();
    while let Some(id) = tasks.join_next().await {
        assert!(header_ids.insert(id.unwrap().expect("x-request-id header")));
    }
    assert_eq!(header_ids.len(), N);
    assert_eq!(counter.load(Ordering::SeqCst), N);

    let lines = log.lines();
    assert_eq!(lines.len(), N);
    let logged_ids: HashSet<String> = lines
        .iter()
        .map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            let get_at = tokens.iter().position(|t| *t == "GET").unwrap();
            tokens[get_at - 1].to_owned()
        })
        .collect();
    assert_eq!(logged_ids, header_ids);
}

#[tokio::test]
async fn serves_over_tcp() {
    let readiness = Readiness::new();
    let log = SharedBuf::default();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let server = tokio::spawn(
        Server::bind(addr)
            .readiness(readiness.clone())
            .serve_listener(listener, fixed_app(readiness.clone(), log.clone()), async move {
                let _ = stopped.await;
            }),
    );

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET / HTTP/1.1\r\nhost: localhost\r\nuser-agent: it\r\nconnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();

    assert!(raw.starts_with("HTTP/1.1 200"), "{raw}");
    assert!(raw.to_ascii_lowercase().contains("x-request-id: 111111"), "{raw}");
    assert!(raw.ends_with("Hello, World!"), "{raw}");

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
    assert!(!readiness.is_ready());

    let lines = log.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(" 200 "), "{}", lines[0]);
    assert!(lines[0].ends_with("\"it\""), "{}", lines[0]);
}

#[tokio::test]
async fn client_gone_mid_body_still_logs_once() {
    let readiness = Readiness::new();
    let log = SharedBuf::default();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();

    let server = tokio::spawn(
        Server::bind(addr)
            .readiness(readiness.clone())
            .serve_listener(listener, fixed_app(readiness.clone(), log.clone()), async move {
                let _ = stopped.await;
            }),
    );

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET / HTTP/1.1\r\nhost: localhost\r\ncontent-length: 100000\r\n\r\nabc")
        .await
        .unwrap();

    // The announced body never arrives; the request must still be answered.
    let logged = tokio::time::timeout(Duration::from_secs(5), async {
        while log.lines().is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    assert!(logged.is_ok(), "no access line while the body was incomplete");
    drop(stream);

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();

    let lines = log.lines();
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].contains(" 200 "), "{}", lines[0]);
}
