//! Static file serving module
//!
//! Serves files from the pre-built frontend bundle with MIME detection and
//! `ETag` revalidation. Anything that does not resolve to a file inside the
//! bundle root is left to the fallback.

use crate::config::FrontendConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, CachePolicy};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// A file loaded from the asset tree
#[derive(Debug)]
pub struct Asset {
    pub path: PathBuf,
    pub content: Vec<u8>,
    pub content_type: &'static str,
}

/// Serve the asset named by the request path, if there is one
pub async fn serve_asset(
    ctx: &RequestContext<'_>,
    frontend: &FrontendConfig,
) -> Option<Response<Full<Bytes>>> {
    let asset = load_from_directory(&frontend.root, ctx.path, &frontend.index_files).await?;

    // An index file reached through "/" is the entry document
    let policy = if asset.path.file_name() == Some(frontend.entry_document.as_ref())
        && asset.path.parent() == Some(Path::new(&frontend.root))
    {
        CachePolicy::ENTRY_DOCUMENT
    } else {
        CachePolicy::ASSET
    };

    Some(build_static_file_response(
        asset.content,
        asset.content_type,
        ctx.if_none_match.as_deref(),
        ctx.is_head,
        policy,
    ))
}

/// Load a file from `static_dir` with index file support.
///
/// `path` is the raw request path and is percent-decoded first. `None` when
/// it does not name a readable regular file inside the directory;
/// parent-directory components never escape it.
pub async fn load_from_directory(
    static_dir: &str,
    path: &str,
    index_files: &[String],
) -> Option<Asset> {
    let Ok(decoded) = percent_decode_str(path).decode_utf8() else {
        logger::log_debug(&format!("Request path is not valid UTF-8 once decoded: {path}"));
        return None;
    };
    let relative: PathBuf = Path::new(decoded.trim_start_matches('/'))
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    let root = Path::new(static_dir);
    let mut file_path = root.join(&relative);

    let root_canonical = match root.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_debug(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // Directories resolve to their first existing index file
    if file_path.is_dir() {
        file_path = index_files
            .iter()
            .map(|index| file_path.join(index))
            .find(|candidate| candidate.is_file())?;
    }

    // File not found is common, no need to log
    let file_canonical = file_path.canonicalize().ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_canonical.display()
        ));
        return None;
    }
    if !file_canonical.is_file() {
        return None;
    }

    let content = match fs::read(&file_path).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {}",
                file_path.display(),
                e
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    Some(Asset {
        path: file_path,
        content,
        content_type,
    })
}

/// Build a file response, answering 304 when the client's `ETag` matches
pub fn build_static_file_response(
    data: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
    policy: CachePolicy,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag, policy);
    }

    http::build_file_response(Bytes::from(data), content_type, &etag, policy, is_head)
}
