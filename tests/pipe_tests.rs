use futures::stream;
use futures_util::StreamExt;
use serde_json::json;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use template_push::pipe;
use template_push::pipe::*;
use template_push::{FileObject, FileStream, PushError, Pusher, Template};

fn pages_pusher() -> Pusher {
    let app = Arc::new(Template::new());
    app.load(
        "pages",
        vec![
            ("index", json!({"path": "index.hbs", "content": "home"})),
            ("about", json!({"path": "about.hbs", "content": "about"})),
            ("draft", json!({"path": "draft.md", "draft": true})),
        ],
    );
    Pusher::from_host(app).unwrap()
}

async fn basenames(stream: FileStream) -> Vec<String> {
    let mut names: Vec<String> = stream
        .map(|item| item.unwrap().basename().unwrap().to_string())
        .collect()
        .await;
    names.sort();
    names
}

#[tokio::test]
async fn test_pipe_map() {
    let stage = pipe::map(|file: FileObject| file.with_data("layout", json!("default")));
    let files: Vec<_> = pages_pusher()
        .push("pages")
        .unwrap()
        .pipe(&stage)
        .collect()
        .await;

    assert_eq!(files.len(), 3);
    assert!(files
        .iter()
        .all(|file| file.as_ref().unwrap().data().get("layout") == Some(&json!("default"))));
}

#[tokio::test]
async fn test_pipe_filter() {
    let stage = pipe::filter(|file: &FileObject| file.data().get("draft").is_none());
    let names = basenames(pages_pusher().push("pages").unwrap().pipe(&stage)).await;
    assert_eq!(names, vec!["about.hbs", "index.hbs"]);
}

#[tokio::test]
async fn test_pipe_inspect_counts() {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    let stage = pipe::inspect(move |_file: &FileObject| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let files: Vec<_> = pages_pusher()
        .push("pages")
        .unwrap()
        .pipe(&stage)
        .collect()
        .await;
    assert_eq!(files.len(), 3);
    assert_eq!(seen.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_pipe_set_extname() {
    let stage = pipe::set_extname(".html");
    let names = basenames(pages_pusher().push("pages").unwrap().pipe(&stage)).await;
    assert_eq!(names, vec!["about.html", "draft.html", "index.html"]);
}

#[tokio::test]
async fn test_pipe_compose() {
    let only_templates =
        pipe::filter(|file: &FileObject| file.extname().as_deref() == Some(".hbs"));
    let render = pipe::set_extname("html");

    let stage = pipe::compose(only_templates, render);
    let names = basenames(pages_pusher().push("pages").unwrap().pipe(&stage)).await;
    assert_eq!(names, vec!["about.html", "index.html"]);
}

#[tokio::test]
async fn test_pipe_ext_compose() {
    let stage = pipe::identity().compose(pipe::set_extname(".txt"));
    let names = basenames(pages_pusher().push("pages").unwrap().pipe(&stage)).await;
    assert_eq!(names, vec!["about.txt", "draft.txt", "index.txt"]);
}

#[tokio::test]
async fn test_errors_pass_through_stages() {
    let input: FileStream = stream::iter(vec![
        Ok(FileObject::new("a.md")),
        Err(PushError::StreamEnded),
        Ok(FileObject::new("b.md")),
    ])
    .boxed();

    let stage = pipe::compose(
        pipe::filter(|file: &FileObject| file.basename() != Some("b.md")),
        pipe::set_extname(".html"),
    );
    let out: Vec<_> = stage.apply(input).collect().await;

    assert_eq!(out.len(), 2);
    assert_eq!(
        out[0].as_ref().unwrap().path(),
        Some(Path::new("a.html"))
    );
    assert!(matches!(out[1], Err(PushError::StreamEnded)));
}
