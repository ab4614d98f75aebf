//! Authoring workflows behind each subcommand.
//!
//! The local record doubles as the form the compile reads its metadata
//! from; the body file holds the text with content flags.

use crate::compiler::{LinkCompiler, StagingDir, flagged_paths};
use crate::config::FolioConfig;
use crate::log;
use crate::project::{
    CompileOptions, ImageRef, ProjectDraft, ProjectHandler, ProjectRecord, compile_project,
    ensure_project_name, project_id,
};
use crate::storage::BlobStore;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

/// Body written for a fresh project.
const DEFAULT_BODY: &str = "<p>Default Text</p>";

/// Create an empty local record and reset the body file.
pub fn new_project(config: &FolioConfig, name: &str) -> Result<()> {
    let name = ensure_project_name(name)?;
    let path = config.projects_dir().join(&name);
    if path.exists() {
        bail!(
            "Project `{name}` already exists at {}. Edit it, or `folio remove` it first.",
            path.display()
        );
    }

    ProjectRecord::default().save(&path)?;
    write_body(config, DEFAULT_BODY)?;
    log!("project"; "created {name}");
    Ok(())
}

/// Log every record published to the store.
pub fn list_projects(store: &dyn BlobStore, config: &FolioConfig) -> Vec<String> {
    let names = ProjectHandler::new(store, config.projects_dir()).list_projects();
    if names.is_empty() {
        log!("project"; "no published projects");
    }
    for name in &names {
        log!("project"; "{name}");
    }
    names
}

/// Download a record and turn it back into something editable.
///
/// The image and every hosted media element are downloaded into the staging
/// directory; the body file is overwritten with the reverse compiled text.
pub fn pull_project(store: &dyn BlobStore, config: &FolioConfig, name: &str) -> Result<()> {
    let name = ensure_project_name(name)?;
    let handler = ProjectHandler::new(store, config.projects_dir());
    let Some(path) = handler.pull_project(&name) else {
        bail!("Could not pull `{name}` from storage");
    };

    let compiler = link_compiler(store, config);
    let mut record = ProjectRecord::load(&path)?;
    record.project_image = compiler.reverse_compile_image(&record.project_image)?;
    record.save(&path)?;

    let body = compiler.compile_backward(&record.project_text)?;
    write_body(config, &body)?;
    log!("project"; "pulled {name} into {}", config.body_path().display());
    Ok(())
}

/// Compile the body into the local record for previewing.
pub fn compile_local(
    store: &dyn BlobStore,
    config: &FolioConfig,
    name: &str,
    clean: bool,
) -> Result<ProjectRecord> {
    let name = ensure_project_name(name)?;
    let compiler = link_compiler(store, config);
    let (draft, body) = load_inputs(config, &name)?;
    if clean {
        let mut keep = flagged_paths(&body);
        if let Some(ImageRef::File(image)) = &draft.image {
            keep.push(image.clone());
        }
        compiler.staging().prune(&keep)?;
    }

    let record = run_compile(&compiler, config, &name, &draft, &body, false)?;
    log!(
        "project";
        "preview at projects/project.html?project={}&local=1",
        project_id(&name)
    );
    Ok(record)
}

/// Upload media, publish the record, then compile again locally so the
/// local record keeps previewing from staged files.
pub fn publish_project(store: &dyn BlobStore, config: &FolioConfig, name: &str) -> Result<String> {
    let name = ensure_project_name(name)?;
    let compiler = link_compiler(store, config);
    let (draft, body) = load_inputs(config, &name)?;

    run_compile(&compiler, config, &name, &draft, &body, true)?;
    let handler = ProjectHandler::new(store, config.projects_dir());
    let Some(url) = handler.upload_project(&name)? else {
        bail!("Could not upload `{name}`, the local record holds the remote compile");
    };
    log!("project"; "published {name} to {url}");

    run_compile(&compiler, config, &name, &draft, &body, false)?;
    Ok(url)
}

/// Delete a record and its media from the store.
pub fn remove_project(store: &dyn BlobStore, config: &FolioConfig, name: &str) -> Result<()> {
    let name = ensure_project_name(name)?;
    if !ProjectHandler::new(store, config.projects_dir()).remove_project(&name) {
        bail!("`{name}` was not fully removed from storage");
    }
    log!("project"; "removed {name}");
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn link_compiler<'s>(store: &'s dyn BlobStore, config: &FolioConfig) -> LinkCompiler<'s> {
    LinkCompiler::new(store, StagingDir::new(config.staging_dir()))
}

/// The draft from the local record, and the body text.
fn load_inputs(config: &FolioConfig, name: &str) -> Result<(ProjectDraft, String)> {
    let path = config.projects_dir().join(name);
    if !path.exists() {
        bail!("No local record `{name}`. Run `folio new` or `folio pull` first.");
    }
    let record = ProjectRecord::load(&path)?;
    let draft = ProjectDraft::from_record(&record, config.projects_dir());

    let body_path = config.body_path();
    let body = fs::read_to_string(&body_path)
        .with_context(|| format!("Failed to read body file {}", body_path.display()))?;
    Ok((draft, body))
}

fn run_compile(
    compiler: &LinkCompiler<'_>,
    config: &FolioConfig,
    name: &str,
    draft: &ProjectDraft,
    body: &str,
    publish_remote: bool,
) -> Result<ProjectRecord> {
    let options = CompileOptions {
        publish_remote,
        minify: config.compile.minify,
        icon_size: config.compile.icon_size,
    };
    let path = config.projects_dir().join(name);
    compile_project(compiler, draft, body, &path, options)
        .with_context(|| format!("Failed to compile {name}"))
}

fn write_body(config: &FolioConfig, body: &str) -> Result<()> {
    let path = config.body_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))
}

/// Sitemap for `dir`, relative to the root.
pub fn build_sitemap(config: &FolioConfig, dir: Option<&Path>) -> Result<()> {
    let dir = config.get_root().join(dir.unwrap_or(Path::new("")));
    let Some(url) = &config.site.url else {
        bail!("[site.url] is required for sitemap generation");
    };
    crate::generator::sitemap::build_sitemap(&dir, url, config.compile.minify)
}
