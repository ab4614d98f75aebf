//! Project records: naming, compilation and storage round trips.
//!
//! A project is edited as two local files in the projects directory: the
//! record `{name}.json`, whose metadata doubles as the compile input, and
//! the shared authoring body. [`compile_project`] turns both into a fresh
//! record; [`ProjectHandler`] moves records to and from storage.

mod handler;
mod record;
mod svg;

pub use handler::ProjectHandler;
pub use record::ProjectRecord;
pub use svg::resize_svg;

use crate::compiler::{CompileError, LinkCompiler};
use crate::log;
use crate::text::quasi_find;
use crate::utils::minify::{MinifyType, minify};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Record name holding the site's project index.
const RESERVED_NAME: &str = "projects.json";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("`{0}` is reserved for system functionality, pick a different name")]
    ReservedName(String),

    #[error("`{0}` is not a valid project name")]
    InvalidName(String),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed project record `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),
}

// ============================================================================
// Naming
// ============================================================================

/// Normalize a user-supplied name to `{base}.json`.
pub fn ensure_project_name(name: &str) -> Result<String, ProjectError> {
    let base = Path::new(name.trim())
        .file_name()
        .map(|base| base.to_string_lossy().into_owned())
        .filter(|base| !base.is_empty())
        .ok_or_else(|| ProjectError::InvalidName(name.to_owned()))?;

    let name = if base.ends_with(".json") { base } else { format!("{base}.json") };
    if name == RESERVED_NAME {
        return Err(ProjectError::ReservedName(name));
    }
    Ok(name)
}

/// Storage folder id of a record name: the name without `.json`.
pub fn project_id(name: &str) -> &str {
    name.strip_suffix(".json").unwrap_or(name)
}

// ============================================================================
// Compile Inputs
// ============================================================================

/// Where the project image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// A local file, staged or uploaded on compile.
    File(PathBuf),
    /// An already hosted image, kept as is.
    Url(String),
}

impl ImageRef {
    /// Relative paths are resolved against the projects directory, the same
    /// base the preview page resolves `src` against.
    pub fn parse(src: &str, projects_dir: &Path) -> Option<Self> {
        let src = src.trim();
        if src.is_empty() {
            None
        } else if src.starts_with("https://") || src.starts_with("http://") {
            Some(Self::Url(src.to_owned()))
        } else {
            Some(Self::File(projects_dir.join(src)))
        }
    }
}

/// The `src` attribute value of an `<img>` tag.
pub fn image_src(img_html: &str) -> Option<&str> {
    let at = quasi_find(img_html, "src=", 0).ok()??;
    let (open, quote) = img_html[at..].char_indices().find(|(_, c)| matches!(c, '"' | '\''))?;
    let value_start = at + open + 1;
    let len = img_html[value_start..].find(quote)?;
    Some(img_html[value_start..value_start + len].trim())
}

/// Everything a compile needs besides the body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub short_title: String,
    pub long_title: String,
    pub image: Option<ImageRef>,
    /// Plain text, without the `<p>` wrapper.
    pub description: String,
    pub technologies: Vec<String>,
    pub tags: Vec<String>,
    pub github_link: String,
    pub force_href: String,
}

impl ProjectDraft {
    /// Read the compile inputs back out of a (local) record.
    pub fn from_record(record: &ProjectRecord, projects_dir: &Path) -> Self {
        Self {
            short_title: record.project_short_title.clone(),
            long_title: record.project_long_title.clone(),
            image: image_src(&record.project_image)
                .and_then(|src| ImageRef::parse(src, projects_dir)),
            description: record
                .project_description
                .replace("<p>", "")
                .replace("</p>", ""),
            technologies: record.applicable_technologies.clone(),
            tags: record.tags.clone(),
            github_link: record.github_link.clone().unwrap_or_default(),
            force_href: record.force_href.clone().unwrap_or_default(),
        }
    }
}

// ============================================================================
// Compile
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    pub publish_remote: bool,
    pub minify: bool,
    pub icon_size: u32,
}

/// Build a record from a draft and a body, and write it to `record_path`.
pub fn compile_project(
    compiler: &LinkCompiler<'_>,
    draft: &ProjectDraft,
    body: &str,
    record_path: &Path,
    options: CompileOptions,
) -> Result<ProjectRecord, ProjectError> {
    let name = record_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let id = project_id(&name);

    let image_src = match &draft.image {
        Some(ImageRef::File(path)) => compiler
            .migrate(path, id, options.publish_remote)
            .unwrap_or_default(),
        Some(ImageRef::Url(url)) => url.clone(),
        None => {
            log!("warn"; "{name} has no project image yet");
            String::new()
        }
    };

    let text = compiler.compile_forward(body, id, options.publish_remote)?;
    let text = minify(MinifyType::Html(&text), options.minify).into_owned();

    let record = ProjectRecord {
        project_short_title: draft.short_title.trim().to_owned(),
        project_long_title: draft.long_title.trim().to_owned(),
        project_image: format!("<img src=\"{image_src}\">"),
        project_description: format!("<p>{}</p>", draft.description.trim()),
        applicable_technologies: draft
            .technologies
            .iter()
            .map(|svg| resize_svg(svg, options.icon_size))
            .collect(),
        tags: draft.tags.clone(),
        force_href: optional_field(&draft.force_href),
        github_link: optional_field(&draft.github_link),
        project_text: text,
    };
    record.save(record_path)?;

    let target = if options.publish_remote { "remote" } else { "local" };
    log!("project"; "compiled {name} ({target})");
    Ok(record)
}

/// Trimmed value, or `None` when blank.
fn optional_field(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::StagingDir;
    use crate::storage::LocalStore;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_project_name() {
        assert_eq!(ensure_project_name("cobot").unwrap(), "cobot.json");
        assert_eq!(ensure_project_name("cobot.json").unwrap(), "cobot.json");
        assert_eq!(ensure_project_name("../projects/cobot").unwrap(), "cobot.json");
        assert!(matches!(ensure_project_name("projects"), Err(ProjectError::ReservedName(_))));
        assert!(matches!(ensure_project_name("a/projects.json"), Err(ProjectError::ReservedName(_))));
        assert!(matches!(ensure_project_name("  "), Err(ProjectError::InvalidName(_))));
    }

    #[test]
    fn test_project_id() {
        assert_eq!(project_id("cobot.json"), "cobot");
        assert_eq!(project_id("cobot"), "cobot");
    }

    #[test]
    fn test_image_src() {
        assert_eq!(image_src("<img src=\"temp/a.png\">"), Some("temp/a.png"));
        assert_eq!(image_src("<img class='x' src = 'temp/a.png'>"), Some("temp/a.png"));
        assert_eq!(image_src("<img src=\"\">"), Some(""));
        assert_eq!(image_src(""), None);
        assert_eq!(image_src("<img src=\"open"), None);
    }

    #[test]
    fn test_image_ref_parse() {
        let dir = Path::new("/site/projects");
        assert_eq!(
            ImageRef::parse("temp/a.png", dir),
            Some(ImageRef::File(PathBuf::from("/site/projects/temp/a.png")))
        );
        assert_eq!(
            ImageRef::parse("https://b.s3.r.amazonaws.com/x.png", dir),
            Some(ImageRef::Url("https://b.s3.r.amazonaws.com/x.png".into()))
        );
        assert_eq!(ImageRef::parse(" ", dir), None);
    }

    #[test]
    fn test_draft_from_record() {
        let record = ProjectRecord {
            project_short_title: "Cobot".into(),
            project_image: "<img src=\"temp/arm.png\">".into(),
            project_description: "<p>An arm.</p>".into(),
            tags: vec!["Robotics".into()],
            github_link: Some("https://github.com/x/cobot".into()),
            ..Default::default()
        };
        let draft = ProjectDraft::from_record(&record, Path::new("/p"));

        assert_eq!(draft.short_title, "Cobot");
        assert_eq!(draft.image, Some(ImageRef::File(PathBuf::from("/p/temp/arm.png"))));
        assert_eq!(draft.description, "An arm.");
        assert_eq!(draft.github_link, "https://github.com/x/cobot");
        assert_eq!(draft.force_href, "");
    }

    #[test]
    fn test_compile_project_local() {
        let dir = TempDir::new().unwrap();
        let projects = dir.path().join("projects");
        fs::create_dir_all(&projects).unwrap();
        fs::write(dir.path().join("arm.png"), b"png").unwrap();
        let store = LocalStore::new(&dir.path().join("bucket"), "b", "us-east-2");
        let compiler = LinkCompiler::new(&store, StagingDir::new(projects.join("temp")));

        let draft = ProjectDraft {
            short_title: "  Cobot ".into(),
            long_title: "Collaborative robot".into(),
            image: Some(ImageRef::File(dir.path().join("arm.png"))),
            description: " An arm. ".into(),
            technologies: vec!["<svg width=\"1\" height=\"1\" ></svg>".into(), "rust".into()],
            tags: vec!["Robotics".into()],
            github_link: "  ".into(),
            force_href: "https://example.com ".into(),
        };
        let body = format!(
            "<p>Intro</p>\n\n!!Content!!:{}\n<p>  end  </p>\n",
            dir.path().join("arm.png").display()
        );
        let path = projects.join("cobot.json");
        let options = CompileOptions {
            publish_remote: false,
            minify: true,
            icon_size: 4,
        };

        let record = compile_project(&compiler, &draft, &body, &path, options).unwrap();

        assert_eq!(record.project_short_title, "Cobot");
        assert_eq!(record.project_image, "<img src=\"temp/arm.png\">");
        assert_eq!(record.project_description, "<p>An arm.</p>");
        assert_eq!(
            record.applicable_technologies,
            vec!["<svg width=\"4em\" height=\"4em\" ></svg>", "rust"]
        );
        assert_eq!(record.github_link, None);
        assert_eq!(record.force_href.as_deref(), Some("https://example.com"));
        assert_eq!(record.project_text, "<p>Intro</p><img src='temp/arm.png'><p> end </p>");
        assert_eq!(ProjectRecord::load(&path).unwrap(), record);
    }

    #[test]
    fn test_compile_project_failure_keeps_record() {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(&dir.path().join("bucket"), "b", "us-east-2");
        let compiler = LinkCompiler::new(&store, StagingDir::new(dir.path().join("temp")));
        let path = dir.path().join("cobot.json");
        fs::write(&path, "{}").unwrap();
        let options = CompileOptions {
            publish_remote: false,
            minify: false,
            icon_size: 4,
        };

        let result = compile_project(
            &compiler,
            &ProjectDraft::default(),
            "!!Content!!:notes.txt",
            &path,
            options,
        );
        assert!(matches!(
            result,
            Err(ProjectError::Compile(CompileError::UnsupportedMediaType { .. }))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
