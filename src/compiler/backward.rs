//! Record → body: hosted media elements become content flags again.

use super::CONTENT_FLAG;
use super::media::{HTML_ELEMENTS, QUOTES};
use super::{CompileError, LinkCompiler};
use crate::log;
use crate::storage::file_name_of;
use crate::text::{Span, locate_block};
use std::path::{Path, PathBuf};

impl LinkCompiler<'_> {
    /// Download every hosted media element and replace it with a content
    /// flag pointing at the downloaded copy.
    ///
    /// Closing tags are moved onto their own line afterwards so the body is
    /// comfortable to edit.
    pub fn compile_backward(&self, text: &str) -> Result<String, CompileError> {
        let mut text = text.to_owned();

        while let Some(url_at) = text.find(&self.search_text) {
            let remaining = text.matches(&self.search_text).count();
            let (element, local) = self.pull_element(&text, url_at)?;
            text.replace_range(element.range(), &format!("\n\n{CONTENT_FLAG}{}\n\n", local.display()));

            if text.matches(&self.search_text).count() >= remaining {
                return Err(CompileError::CompileIntegrity(format!(
                    "hosted URL at {url_at} survived its replacement"
                )));
            }
        }

        Ok(text.replace("</", "\n</"))
    }

    /// Turn a hosted `<img>` back into one pointing at the staged copy.
    ///
    /// Text without a hosted URL is returned unchanged.
    pub fn reverse_compile_image(&self, img_html: &str) -> Result<String, CompileError> {
        let Some(url_at) = img_html.find(&self.search_text) else {
            return Ok(img_html.to_owned());
        };
        let (_, local) = self.pull_element(img_html, url_at)?;
        let name = local
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(format!("<img src=\"{}\">", self.staging.reference(&name)))
    }

    /// Locate the quoted URL at `url_at` and its enclosing element, and
    /// download the URL into the staging directory.
    ///
    /// A failed download is logged; the returned path is where the file
    /// would have been.
    fn pull_element(&self, text: &str, url_at: usize) -> Result<(Span, PathBuf), CompileError> {
        let quoted = locate_block(text, url_at, QUOTES)?;
        let url = quoted
            .shrink(text)
            .filter(|span| span.contains(url_at))
            .ok_or_else(|| CompileError::CompileIntegrity(format!("unquoted hosted URL at {url_at}")))?
            .isolate(text);

        let element = locate_block(text, url_at, HTML_ELEMENTS)?;
        if !element.contains(url_at) {
            return Err(CompileError::CompileIntegrity(format!(
                "`{url}` is not inside a media element"
            )));
        }

        let staging = self.staging.path();
        let local = self
            .store
            .download_url_to_directory(url, staging)
            .unwrap_or_else(|err| {
                log!("error"; "download of {url} failed: {err}");
                staging.join(file_name_of(url))
            });
        log!("compile"; "{} <- {url}", display_name(&local));
        Ok((element, local))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
