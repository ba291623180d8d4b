// Upload session behaviour across several files with mixed backend outcomes.
use mockito::{Matcher, Server};
use serde_json::json;
use std::path::PathBuf;
use syllabai::client::{BackendClient, EXTRACT_ENDPOINT};
use syllabai::context::TestContext;
use syllabai::model::Section;
use syllabai::session::{SyllabusSelections, UploadSession};

fn success_body(title: &str, with_policies: bool) -> String {
    let mut analyzed = json!({
        "courseInfo": { "title": title, "description": "" },
        "schedule": { "entries": [{ "date": "2/3", "topic": "Intro" }] }
    });
    if with_policies {
        analyzed["policies"] = json!({ "attendance": "Required" });
    }
    json!({ "analyzed": analyzed.to_string() }).to_string()
}

fn files(ctx: &TestContext, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = ctx.root.join(name);
            std::fs::write(&path, format!("contents of {}", name)).unwrap();
            path
        })
        .collect()
}

async fn mock_for(server: &mut Server, file: &str, status: usize, body: String) -> mockito::Mock {
    server
        .mock("POST", EXTRACT_ENDPOINT)
        .match_body(Matcher::Regex(format!(r#"filename="{}""#, file)))
        .with_status(status)
        .with_body(body)
        .create_async()
        .await
}

#[tokio::test]
async fn test_one_rate_limited_file_does_not_block_the_others() {
    let mut server = Server::new_async().await;
    let _a = mock_for(&mut server, "a.txt", 200, success_body("Algebra", true)).await;
    let _b = mock_for(&mut server, "b.txt", 429, String::new()).await;
    let _c = mock_for(&mut server, "c.txt", 200, success_body("Chemistry", false)).await;

    let ctx = TestContext::new();
    let paths = files(&ctx, &["a.txt", "b.txt", "c.txt"]);
    let client = BackendClient::new(&server.url()).unwrap();

    let mut session = UploadSession::new();
    let summary = session.upload(&client, &paths, 2).await;

    assert_eq!(summary.parsed, 2);
    assert_eq!(summary.failed, 1);
    assert!(session.is_rate_limited());

    let names: Vec<&str> = session.files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    assert_eq!(
        session.files()[1].error(),
        Some("Failed to extract text from b.txt: Rate limit exceeded. Please try again later.")
    );

    let syllabuses = session.syllabuses();
    let titles: Vec<&str> = syllabuses.iter().map(|s| s.title()).collect();
    assert_eq!(titles, vec!["Algebra", "Chemistry"]);

    let selections = SyllabusSelections::from_syllabuses(&syllabuses);
    assert!(selections.has("a.txt", &Section::Policies));
    assert_eq!(
        selections.common_sections(),
        vec![Section::CourseInfo, Section::Schedule]
    );
}

#[tokio::test]
async fn test_banner_reflects_only_the_latest_batch() {
    let mut server = Server::new_async().await;
    let _limited = mock_for(&mut server, "a.txt", 429, String::new()).await;
    let _ok = mock_for(&mut server, "d.txt", 200, success_body("Drama", false)).await;

    let ctx = TestContext::new();
    let client = BackendClient::new(&server.url()).unwrap();
    let mut session = UploadSession::new();

    session.upload(&client, &files(&ctx, &["a.txt"]), 1).await;
    assert!(session.is_rate_limited());

    session.upload(&client, &files(&ctx, &["d.txt"]), 1).await;
    assert!(!session.is_rate_limited());
    assert_eq!(session.files().len(), 2);
    assert_eq!(session.syllabuses().len(), 1);
}

#[tokio::test]
async fn test_load_analyzed_reads_records_and_reports_bad_ones() {
    let ctx = TestContext::new();
    let good = ctx.root.join("calc.json");
    std::fs::write(
        &good,
        "```json\n{\"courseInfo\": {\"title\": \"Calculus\"}, \"materials\": [\"Book\"]}\n```",
    )
    .unwrap();
    let bad = ctx.root.join("broken.json");
    std::fs::write(&bad, "{\"materials\": []}").unwrap();

    let mut session = UploadSession::new();
    let summary = session.load_analyzed(&[good, bad]).await;

    assert_eq!((summary.parsed, summary.failed), (1, 1));
    assert_eq!(session.syllabuses()[0].title(), "Calculus");
    let error = session.files()[1].error().unwrap();
    assert!(error.starts_with("Failed to extract text from broken.json: "));
    assert!(session.files()[1].is_local_failure());
}

#[tokio::test]
async fn test_unsupported_file_is_rejected_locally_and_backend_failures_are_not() {
    let mut server = Server::new_async().await;
    let unused = server
        .mock("POST", EXTRACT_ENDPOINT)
        .match_body(Matcher::Regex(r#"filename="grades.xlsx""#.into()))
        .expect(0)
        .create_async()
        .await;
    let _down = mock_for(&mut server, "a.txt", 500, String::new()).await;

    let ctx = TestContext::new();
    let paths = files(&ctx, &["grades.xlsx", "a.txt"]);
    let client = BackendClient::new(&server.url()).unwrap();
    let mut session = UploadSession::new();
    let summary = session.upload(&client, &paths, 1).await;

    assert_eq!(summary.failed, 2);
    assert!(session.files()[0].is_local_failure());
    assert!(!session.files()[1].is_local_failure());
    assert!(!session.is_rate_limited());
    unused.assert_async().await;
}
