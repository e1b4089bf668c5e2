use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::{
    ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    schemars, tool, tool_router,
};
use serde::{Deserialize, Serialize};

use crate::executor;
use crate::groups::{validate_groups, GroupSet, GroupSpec};
use crate::package;
use crate::pdf::PdfDocument;
use crate::plan::{build_plan, SplitMode};

// Request structs for tools

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PathRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct GroupArg {
    #[schemars(description = "Display name for the group")]
    pub name: String,
    #[schemars(description = "Page range expression (e.g., '1-3, 5, 8-10'), 1-based inclusive")]
    pub range: String,
}

impl From<GroupArg> for GroupSpec {
    fn from(arg: GroupArg) -> Self {
        GroupSpec {
            name: arg.name,
            range: arg.range,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ValidateGroupsRequest {
    #[schemars(description = "Path to the PDF file")]
    pub path: String,
    #[schemars(description = "Named groups to check against each other")]
    pub groups: Vec<GroupArg>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SplitRangeRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Page range expression (e.g., '1-3, 5, 8-10')")]
    pub pages: String,
    #[schemars(description = "Output file path")]
    pub output: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SplitEveryRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Directory to write one PDF per page into")]
    pub output_dir: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SplitGroupsRequest {
    #[schemars(description = "Path to the source PDF file")]
    pub path: String,
    #[schemars(description = "Named groups, one output document per group")]
    pub groups: Vec<GroupArg>,
    #[schemars(description = "Permit pages claimed by more than one group (default: false)")]
    #[serde(default)]
    pub allow_overlaps: bool,
    #[schemars(description = "Output ZIP archive path")]
    pub output: String,
}

#[derive(Debug, Clone)]
pub struct SplitServer {
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl SplitServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }
}

impl Default for SplitServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl SplitServer {
    #[tool(description = "Get a PDF's file size and page count")]
    fn pdf_info(&self, Parameters(PathRequest { path }): Parameters<PathRequest>) -> String {
        match info(&path) {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(
        description = "Validate named page groups against a PDF: parse every range and report pages claimed by more than one group"
    )]
    fn pdf_validate_groups(
        &self,
        Parameters(req): Parameters<ValidateGroupsRequest>,
    ) -> String {
        let doc = match PdfDocument::open(&req.path) {
            Ok(d) => d,
            Err(e) => return format!("Error: {}", e),
        };

        let set = GroupSet::from_specs(req.groups.into_iter().map(GroupSpec::from));
        let result = validate_groups(set.groups(), doc.page_count());
        serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
    }

    #[tool(
        description = "Extract a page range from a PDF into a new file. Range syntax: '1-3, 5, 8-10' (1-based, inclusive)."
    )]
    async fn pdf_split_range(
        &self,
        Parameters(req): Parameters<SplitRangeRequest>,
    ) -> String {
        match split_range(&req).await {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(description = "Split a PDF into one single-page PDF per page, written to a directory")]
    async fn pdf_split_every(
        &self,
        Parameters(req): Parameters<SplitEveryRequest>,
    ) -> String {
        match split_every(&req).await {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }

    #[tool(
        description = "Split a PDF into named groups and package the outputs as a ZIP archive. Overlapping groups are rejected unless allow_overlaps is set."
    )]
    async fn pdf_split_groups(
        &self,
        Parameters(req): Parameters<SplitGroupsRequest>,
    ) -> String {
        match split_groups(&req).await {
            Ok(result) => {
                serde_json::to_string_pretty(&result).unwrap_or_else(|e| format!("Error: {}", e))
            }
            Err(e) => format!("Error: {}", e),
        }
    }
}

fn info(path: &str) -> Result<PdfInfoResult> {
    let file_size = std::fs::metadata(path)
        .with_context(|| format!("Failed to stat: {path}"))?
        .len();
    let doc = PdfDocument::open(path)?;
    Ok(PdfInfoResult {
        path: path.to_string(),
        page_count: doc.page_count(),
        file_size,
    })
}

fn load_source(path: &str) -> Result<(Arc<Vec<u8>>, u32)> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read PDF: {path}"))?;
    let doc = PdfDocument::from_bytes(&bytes)
        .with_context(|| format!("Failed to parse PDF: {path}"))?;
    let total_pages = doc.page_count();
    Ok((Arc::new(bytes), total_pages))
}

async fn split_range(req: &SplitRangeRequest) -> Result<SplitRangeResult> {
    let (source, total_pages) = load_source(&req.path)?;

    let plan = build_plan(&SplitMode::Range(req.pages.clone()), total_pages)?;
    let page_count = plan.entries[0].pages.len() as u32;
    if page_count == 0 {
        anyhow::bail!("No pages specified");
    }

    let outputs = executor::execute(source, &plan).await?;
    let out = outputs.into_iter().next().context("No output produced")?;
    std::fs::write(&req.output, &out.bytes)
        .with_context(|| format!("Failed to write: {}", req.output))?;

    Ok(SplitRangeResult {
        output_path: req.output.clone(),
        page_count,
    })
}

async fn split_every(req: &SplitEveryRequest) -> Result<SplitEveryResult> {
    let (source, total_pages) = load_source(&req.path)?;
    if total_pages == 0 {
        anyhow::bail!("Document has no pages");
    }

    let plan = build_plan(&SplitMode::EveryPage, total_pages)?;
    let outputs = executor::execute(source, &plan).await?;

    std::fs::create_dir_all(&req.output_dir)
        .with_context(|| format!("Failed to create directory: {}", req.output_dir))?;
    let mut files = Vec::with_capacity(outputs.len());
    for output in &outputs {
        std::fs::write(Path::new(&req.output_dir).join(&output.name), &output.bytes)
            .with_context(|| format!("Failed to write: {}", output.name))?;
        files.push(output.name.clone());
    }

    Ok(SplitEveryResult {
        output_dir: req.output_dir.clone(),
        files,
    })
}

async fn split_groups(req: &SplitGroupsRequest) -> Result<SplitGroupsResult> {
    let (source, total_pages) = load_source(&req.path)?;

    let set = GroupSet::from_specs(req.groups.iter().cloned().map(GroupSpec::from));
    if set.is_empty() {
        anyhow::bail!("No groups specified");
    }

    if !req.allow_overlaps {
        let validation = validate_groups(set.groups(), total_pages);
        if !validation.valid {
            anyhow::bail!(
                "{}",
                validation.error.unwrap_or_else(|| "Invalid groups".to_string())
            );
        }
    }

    let plan = build_plan(&SplitMode::Groups(set.groups().to_vec()), total_pages)?;
    if plan.entries.is_empty() {
        anyhow::bail!("None of the groups selected any pages");
    }

    let outputs = executor::execute(source, &plan).await?;
    let archive = package::write_zip(&outputs)?;
    std::fs::write(&req.output, archive)
        .with_context(|| format!("Failed to write: {}", req.output))?;

    Ok(SplitGroupsResult {
        output_path: req.output.clone(),
        outputs: outputs.into_iter().map(|o| o.name).collect(),
    })
}

// Result types for MCP tools

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PdfInfoResult {
    pub path: String,
    pub page_count: u32,
    pub file_size: u64,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitRangeResult {
    pub output_path: String,
    pub page_count: u32,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitEveryResult {
    pub output_dir: String,
    pub files: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SplitGroupsResult {
    pub output_path: String,
    pub outputs: Vec<String>,
}

impl ServerHandler for SplitServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "PDF splitting tools. Use pdf_info for document facts, pdf_validate_groups to \
                 check named page groups for overlaps, pdf_split_range to extract one page range, \
                 pdf_split_every to burst a document into single pages, and pdf_split_groups to \
                 produce one document per named group as a ZIP archive. Page ranges are 1-based, \
                 comma-separated, inclusive (e.g. '1-3, 5, 8-10')."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

pub async fn run_server() -> Result<()> {
    let server = SplitServer::new();

    // Serve using stdin/stdout as a tuple
    let service = server.serve((tokio::io::stdin(), tokio::io::stdout())).await?;

    service.waiting().await?;

    Ok(())
}
