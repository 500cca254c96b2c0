//! The `crawl` tool: definition, argument handling and reply text
//!
//! The handler validates arguments into a [`CrawlRequest`], runs it on its own
//! task, and always answers with a single text item. Run failures and
//! unexpected faults (a panic included) come back as `Error: ...` text instead
//! of a protocol error, so the session keeps going.

use rmcp::model::{CallToolResult, Content, JsonObject, RawContent, Tool};
use serde_json::{json, Value};
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{error, info, instrument};
use url::Url;

use super::{ToolError, ToolRegistry};
use crate::orchestrator::{CrawlRequest, Orchestrator, DEFAULT_MAX_DEPTH};
use crate::processor::{CrawlOutcome, CrawlStats};
use crate::sanitize::TextSanitizer;

pub const CRAWL_TOOL_NAME: &str = "crawl";

const CRAWL_TOOL_DESCRIPTION: &str =
    "Crawls a website and saves its content as structured markdown to a file";

/// Definition of the `crawl` tool
pub fn crawl_tool() -> Tool {
    Tool::new(
        CRAWL_TOOL_NAME,
        CRAWL_TOOL_DESCRIPTION,
        Arc::new(crawl_input_schema()),
    )
}

fn crawl_input_schema() -> JsonObject {
    let mut schema = JsonObject::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("required".to_string(), json!(["url"]));
    schema.insert(
        "properties".to_string(),
        json!({
            "url": {
                "type": "string",
                "description": "URL to crawl"
            },
            "max_depth": {
                "type": "integer",
                "description": "Maximum crawling depth",
                "default": DEFAULT_MAX_DEPTH
            },
            "include_external": {
                "type": "boolean",
                "description": "Whether to include external links",
                "default": false
            },
            "verbose": {
                "type": "boolean",
                "description": "Enable verbose output",
                "default": true
            },
            "output_file": {
                "type": "string",
                "description": "Path to output file (generated if not provided)",
                "default": null
            }
        }),
    );
    schema
}

/// Get all tools the server offers
pub fn tools() -> Vec<Tool> {
    vec![crawl_tool()]
}

/// Register every tool handler
pub fn register_tools(
    registry: &mut ToolRegistry,
    orchestrator: Orchestrator,
    sanitizer: TextSanitizer,
) {
    register_crawl_tool(registry, orchestrator, sanitizer);
}

fn register_crawl_tool(
    registry: &mut ToolRegistry,
    orchestrator: Orchestrator,
    sanitizer: TextSanitizer,
) {
    registry.register_tool_handler(crawl_tool(), move |arguments| {
        let orchestrator = orchestrator.clone();
        async move { handle_crawl(orchestrator, sanitizer, arguments).await }
    });
}

#[instrument(skip_all)]
async fn handle_crawl(
    orchestrator: Orchestrator,
    sanitizer: TextSanitizer,
    arguments: JsonObject,
) -> Result<CallToolResult, ToolError> {
    let (url, request) = parse_crawl_request(&arguments)?;
    info!(url = %url, max_depth = request.max_depth, "Crawl requested");

    // A panic inside the run surfaces here as a JoinError
    let run = tokio::spawn(async move { orchestrator.run(request).await });

    let text = match run.await {
        Ok(CrawlOutcome::Success { file_path, stats }) => format_summary(&url, &file_path, &stats),
        Ok(CrawlOutcome::Failure { error, .. }) => format!("Error: {error}"),
        Err(e) => {
            let message = fault_message(e);
            error!("Crawl task failed: {}", message);
            format!("Error: {}", sanitizer.sanitize(Some(&message)))
        }
    };

    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// Validate raw tool arguments
///
/// Returns the `url` argument as given, alongside the request built from it.
pub fn parse_crawl_request(arguments: &JsonObject) -> Result<(String, CrawlRequest), ToolError> {
    let url = match arguments.get("url") {
        None | Some(Value::Null) => return Err(ToolError::MissingArgument("url".to_string())),
        Some(Value::String(url)) => url.clone(),
        Some(_) => return Err(ToolError::invalid("url", "expected a string")),
    };
    let start_url = Url::parse(&url).map_err(|e| ToolError::invalid("url", e.to_string()))?;
    if !matches!(start_url.scheme(), "http" | "https") {
        return Err(ToolError::invalid("url", "only http and https URLs can be crawled"));
    }

    let mut request = CrawlRequest::new(start_url);

    if let Some(value) = present(arguments, "max_depth") {
        request.max_depth = value
            .as_u64()
            .and_then(|depth| u32::try_from(depth).ok())
            .ok_or_else(|| ToolError::invalid("max_depth", "expected a non-negative integer"))?;
    }
    if let Some(value) = present(arguments, "include_external") {
        request.include_external = bool_argument("include_external", value)?;
    }
    if let Some(value) = present(arguments, "verbose") {
        request.verbose = bool_argument("verbose", value)?;
    }
    if let Some(value) = present(arguments, "output_file") {
        let path = value
            .as_str()
            .ok_or_else(|| ToolError::invalid("output_file", "expected a string"))?;
        request.output_file = (!path.is_empty()).then(|| PathBuf::from(path));
    }

    Ok((url, request))
}

fn present<'a>(arguments: &'a JsonObject, name: &str) -> Option<&'a Value> {
    arguments.get(name).filter(|value| !value.is_null())
}

fn bool_argument(name: &str, value: &Value) -> Result<bool, ToolError> {
    value
        .as_bool()
        .ok_or_else(|| ToolError::invalid(name, "expected a boolean"))
}

/// Reply text for a completed crawl
pub fn format_summary(url: &str, file_path: &Path, stats: &CrawlStats) -> String {
    format!(
        "## Crawl completed successfully\n\
         - URL: {url}\n\
         - Result file: {path}\n\
         - Duration: {duration:.2} seconds\n\
         - Pages processed: {successful} successful, {failed} failed, {not_found} not found (404), {forbidden} access forbidden (403)\n\
         \n\
         You can view the results in the file: {path}\n",
        path = file_path.display(),
        duration = stats.duration_seconds(),
        successful = stats.successful_pages,
        failed = stats.failed_pages,
        not_found = stats.not_found_pages,
        forbidden = stats.forbidden_pages,
    )
}

/// Text of a single-item tool result, or the whole result as JSON otherwise
pub fn result_text(result: &CallToolResult) -> String {
    if let [content] = result.content.as_slice() {
        if let RawContent::Text(text) = &content.raw {
            return text.text.clone();
        }
    }
    serde_json::to_string(result).unwrap_or_else(|e| format!("Unreadable tool result: {e}"))
}

fn fault_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }
    panic_message(err.into_panic())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "crawl task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{CrawlEngine, CrawlError, CrawlerConfig, PageResult};
    use crate::orchestrator::OrchestratorConfig;
    use crate::sanitize::OutputEncoding;
    use futures::future::BoxFuture;
    use tempfile::tempdir;

    struct StubEngine(Vec<PageResult>);

    impl CrawlEngine for StubEngine {
        fn crawl<'a>(
            &'a self,
            _start_url: &'a Url,
            _config: &'a CrawlerConfig,
        ) -> BoxFuture<'a, Result<Vec<PageResult>, CrawlError>> {
            let pages = self.0.clone();
            Box::pin(async move { Ok(pages) })
        }
    }

    struct PanickingEngine;

    impl CrawlEngine for PanickingEngine {
        fn crawl<'a>(
            &'a self,
            _start_url: &'a Url,
            _config: &'a CrawlerConfig,
        ) -> BoxFuture<'a, Result<Vec<PageResult>, CrawlError>> {
            Box::pin(async { Ok(explode()) })
        }
    }

    fn explode() -> Vec<PageResult> {
        panic!("engine exploded \u{2014} badly")
    }

    struct FailingEngine;

    impl CrawlEngine for FailingEngine {
        fn crawl<'a>(
            &'a self,
            _start_url: &'a Url,
            _config: &'a CrawlerConfig,
        ) -> BoxFuture<'a, Result<Vec<PageResult>, CrawlError>> {
            Box::pin(async { Err(CrawlError::Engine("dns lookup failed".to_string())) })
        }
    }

    fn registry_with(engine: impl CrawlEngine + 'static, encoding: OutputEncoding) -> ToolRegistry {
        let orchestrator = Orchestrator::new(Arc::new(engine), OrchestratorConfig::default());
        let mut registry = ToolRegistry::new();
        register_tools(&mut registry, orchestrator, TextSanitizer::new(encoding));
        registry
    }

    fn args(value: Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    fn scenario_pages() -> Vec<PageResult> {
        vec![
            PageResult::new("https://example.com/")
                .with_markdown("Welcome to [Example](https://example.com/about)")
                .with_title("Example")
                .with_depth(0),
            PageResult::new("https://example.com/missing")
                .with_markdown("<center>404 Not Found</center><hr>nginx")
                .with_depth(1),
        ]
    }

    #[test]
    fn test_crawl_tool_definition() {
        let tool = crawl_tool();
        assert_eq!(tool.name, "crawl");
        assert_eq!(tool.description, CRAWL_TOOL_DESCRIPTION);

        let schema = tool.schema_as_json_value();
        assert_eq!(schema["required"], json!(["url"]));
        assert_eq!(schema["properties"]["url"]["type"], "string");
        assert_eq!(schema["properties"]["max_depth"]["type"], "integer");
        assert_eq!(schema["properties"]["max_depth"]["default"], 2);
        assert_eq!(schema["properties"]["include_external"]["default"], false);
        assert_eq!(schema["properties"]["verbose"]["default"], true);
        assert_eq!(schema["properties"]["output_file"]["type"], "string");
        assert_eq!(
            schema["properties"]["output_file"].get("default"),
            Some(&Value::Null)
        );
        assert_eq!(tools().len(), 1);
    }

    #[test]
    fn test_parse_defaults() {
        let (url, request) =
            parse_crawl_request(&args(json!({"url": "https://example.com"})).unwrap()).unwrap();
        assert_eq!(url, "https://example.com");
        assert_eq!(request.start_url.as_str(), "https://example.com/");
        assert_eq!(request.max_depth, 2);
        assert!(!request.include_external);
        assert!(request.verbose);
        assert_eq!(request.output_file, None);
    }

    #[test]
    fn test_parse_all_arguments() {
        let arguments = args(json!({
            "url": "http://example.com/docs",
            "max_depth": 0,
            "include_external": true,
            "verbose": false,
            "output_file": "out/site.md"
        }))
        .unwrap();
        let (_, request) = parse_crawl_request(&arguments).unwrap();
        assert_eq!(request.max_depth, 0);
        assert!(request.include_external);
        assert!(!request.verbose);
        assert_eq!(request.output_file, Some(PathBuf::from("out/site.md")));
    }

    #[test]
    fn test_parse_treats_null_and_empty_as_absent() {
        let arguments = args(json!({
            "url": "https://example.com",
            "max_depth": null,
            "output_file": ""
        }))
        .unwrap();
        let (_, request) = parse_crawl_request(&arguments).unwrap();
        assert_eq!(request.max_depth, 2);
        assert_eq!(request.output_file, None);
    }

    #[test]
    fn test_parse_rejections() {
        let cases = [
            (json!({}), ToolError::MissingArgument("url".to_string())),
            (json!({"url": null}), ToolError::MissingArgument("url".to_string())),
            (json!({"url": 42}), ToolError::invalid("url", "expected a string")),
            (
                json!({"url": "ftp://example.com"}),
                ToolError::invalid("url", "only http and https URLs can be crawled"),
            ),
            (
                json!({"url": "https://example.com", "max_depth": -1}),
                ToolError::invalid("max_depth", "expected a non-negative integer"),
            ),
            (
                json!({"url": "https://example.com", "max_depth": "2"}),
                ToolError::invalid("max_depth", "expected a non-negative integer"),
            ),
            (
                json!({"url": "https://example.com", "verbose": "yes"}),
                ToolError::invalid("verbose", "expected a boolean"),
            ),
            (
                json!({"url": "https://example.com", "output_file": 7}),
                ToolError::invalid("output_file", "expected a string"),
            ),
        ];

        for (arguments, expected) in cases {
            let err = parse_crawl_request(&args(arguments.clone()).unwrap()).unwrap_err();
            assert_eq!(err, expected, "arguments: {arguments}");
        }

        let err = parse_crawl_request(&args(json!({"url": "not a url"})).unwrap()).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument { ref name, .. } if name == "url"));
    }

    #[test]
    fn test_format_summary() {
        let mut stats = CrawlStats::start();
        stats.successful_pages = 3;
        stats.failed_pages = 1;
        stats.not_found_pages = 2;
        stats.forbidden_pages = 0;
        stats.end_time = Some(stats.start_time + chrono::Duration::milliseconds(1234));

        let summary = format_summary("https://example.com", Path::new("/tmp/out.md"), &stats);
        assert!(summary.starts_with("## Crawl completed successfully\n"));
        assert!(summary.contains("- URL: https://example.com\n"));
        assert!(summary.contains("- Result file: /tmp/out.md\n"));
        assert!(summary.contains("- Duration: 1.23 seconds\n"));
        assert!(summary.contains(
            "- Pages processed: 3 successful, 1 failed, 2 not found (404), 0 access forbidden (403)\n"
        ));
        assert!(summary.ends_with("You can view the results in the file: /tmp/out.md\n"));
    }

    #[tokio::test]
    async fn test_crawl_end_to_end() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.md");
        let registry = registry_with(StubEngine(scenario_pages()), OutputEncoding::Utf8);

        let result = registry
            .call(
                "crawl",
                args(json!({
                    "url": "https://example.com",
                    "max_depth": 1,
                    "output_file": output.to_string_lossy()
                })),
            )
            .await
            .unwrap();

        assert_eq!(result.content.len(), 1);
        let text = result_text(&result);
        assert!(text.contains("## Crawl completed successfully"));
        assert!(text.contains("1 successful, 0 failed, 1 not found (404), 0 access forbidden (403)"));

        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written.matches("## Content").count(), 1);
        assert!(written.contains("# Example\n"));
        assert!(written.contains("Welcome to Example"));
        assert!(!written.contains("https://example.com/about"));
        assert!(!written.contains("404 Not Found"));
    }

    #[tokio::test]
    async fn test_crawl_failure_is_text() {
        let registry = registry_with(FailingEngine, OutputEncoding::Utf8);
        let result = registry
            .call("crawl", args(json!({"url": "https://example.com"})))
            .await
            .unwrap();
        assert_eq!(
            result_text(&result),
            "Error: Crawling error: Engine error: dns lookup failed"
        );
    }

    #[tokio::test]
    async fn test_crawl_panic_is_sanitized_text() {
        let registry = registry_with(PanickingEngine, OutputEncoding::Ascii);
        let result = registry
            .call("crawl", args(json!({"url": "https://example.com"})))
            .await
            .unwrap();
        assert_eq!(result_text(&result), "Error: engine exploded -- badly");

        // The registry keeps serving after a fault
        let err = registry.call("crawl", args(json!({}))).await.unwrap_err();
        assert_eq!(err, ToolError::MissingArgument("url".to_string()));
    }

    #[tokio::test]
    async fn test_unknown_tool_rejected() {
        let registry = registry_with(StubEngine(Vec::new()), OutputEncoding::Utf8);
        let err = registry
            .call("scrape", args(json!({"url": "https://example.com"})))
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::UnknownTool("scrape".to_string()));
    }

    #[test]
    fn test_panic_message_payloads() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(7_u8)), "crawl task panicked");
    }
}
