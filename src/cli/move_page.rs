//! Page move command.
//!
//! Moves one page and everything that refers to it by location:
//!
//! 1. the page file (`git mv` inside a repository, rename otherwise)
//! 2. its local images, into `<product>/<images_dir>/`
//! 3. the image references inside the moved page
//! 4. the navigation entry
//! 5. a redirect from the old URL to the new one

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use regex::Regex;

use super::common::load_manifest;
use crate::config::{SweepConfig, title_case};
use crate::content::page_id;
use crate::image::{ImageTarget, extract_image_refs, resolve_image};
use crate::manifest::NavLocation;
use crate::redirect::{RedirectEntry, RedirectRecord};
use crate::utils::exec::{Cmd, ExecError, FilterRule};
use crate::utils::path::fs::relative_from;
use crate::utils::path::resolve_path;
use crate::utils::path::route::page_url;
use crate::{debug, debug_do, log};

/// `git mv` advice lines are noise here.
const GIT_FILTER: FilterRule = FilterRule::new(&["hint:"]);

/// Move the page `src` to `dest`, both relative to the root or absolute.
pub fn move_page(config: &SweepConfig, src: &Path, dest: &Path, no_git: bool) -> Result<()> {
    let root = config.root();
    let (src, dest) = validate_paths(config, src, dest)?;

    let old_id = page_id(&src, root);
    let new_id = page_id(&dest, root);
    let parts: Vec<&str> = new_id.split('/').collect();
    if parts.len() < 3 {
        bail!("destination `{new_id}` must be at least `<product>/<category>/<page>`");
    }

    // manifest edits are prepared up front so a bad docs.json stops the
    // move before any file is touched
    let mut manifest = load_manifest(config)?;
    let nav_update = match manifest.navigation()? {
        Some(nav) => {
            let nav = nav.without_page(&old_id).unwrap_or_else(|| {
                log!("warning"; "`{}` was not in navigation", old_id);
                nav
            });
            let location = nav_location(config, &parts);
            Some((nav.with_page(&location, &new_id), location))
        }
        None => None,
    };
    let mut redirects = manifest.redirects()?;
    let source = page_url(&old_id);
    let redirect_exists = redirects.iter().any(|e| e.source() == Some(source.as_str()));

    let use_git = !no_git && gix::discover(root).is_ok();
    debug!("move"; "git: {}", use_git);

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    move_path(root, &src, &dest, use_git)?;
    log!("move"; "{} -> {}", config.root_relative(&src), config.root_relative(&dest));

    let images_dir = format!("{}/{}", parts[0], config.layout.images_dir);
    let moved = move_images(config, &src, &dest, &images_dir, use_git)?;
    if moved > 0 {
        log!("images"; "{} image reference(s) now under {}", moved, images_dir);
    }

    match nav_update {
        Some((nav, location)) => {
            manifest.set_navigation(&nav);
            match &location.subgroup {
                Some(sub) => log!("nav"; "{} > {} > {}", location.tab, location.group, sub),
                None => log!("nav"; "{} > {}", location.tab, location.group),
            }
        }
        None => log!("warning"; "{} has no `navigation`", config.root_relative(manifest.path())),
    }

    if redirect_exists {
        log!("redirect"; "{} already redirected", source);
    } else {
        let destination = page_url(&new_id);
        log!("redirect"; "{} -> {}", source, destination);
        redirects.push(RedirectEntry::from(RedirectRecord::new(source, destination)));
    }
    manifest.set_redirects(&redirects)?;

    manifest.save()?;
    log!("done"; "updated {}", config.root_relative(manifest.path()));
    Ok(())
}

/// Absolute source and destination, with the page extension checked.
fn validate_paths(config: &SweepConfig, src: &Path, dest: &Path) -> Result<(PathBuf, PathBuf)> {
    let root = config.root();
    let ext = config.scan.page_extension.as_str();

    let src = resolve_path(src, root);
    if !src.is_file() {
        bail!("source {} does not exist", src.display());
    }
    if !has_page_extension(&src, ext) {
        bail!("source {} is not a .{} page", src.display(), ext);
    }

    let mut dest = resolve_path(dest, root);
    if !has_page_extension(&dest, ext) {
        let mut name = dest.clone().into_os_string();
        name.push(format!(".{ext}"));
        dest = PathBuf::from(name);
    }
    if dest.exists() {
        bail!("destination {} already exists", dest.display());
    }
    if !dest.starts_with(root) {
        bail!("destination {} is outside {}", dest.display(), root.display());
    }

    Ok((src, dest))
}

fn has_page_extension(path: &Path, ext: &str) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(ext)
}

fn nav_location(config: &SweepConfig, parts: &[&str]) -> NavLocation {
    NavLocation {
        tab: config.layout.product_label(parts[0]),
        group: config.layout.category_label(parts[1]),
        subgroup: (parts.len() >= 4).then(|| title_case(parts[2])),
    }
}

/// Move `from` to `to`; inside a repository `git mv` is tried first.
fn move_path(root: &Path, from: &Path, to: &Path, use_git: bool) -> Result<()> {
    if use_git {
        let git_mv = Cmd::new("git")
            .args([OsStr::new("mv"), from.as_os_str(), to.as_os_str()])
            .cwd(root)
            .filter(&GIT_FILTER)
            .run();
        match git_mv {
            Ok(_) => return Ok(()),
            // untracked files cannot be moved by git
            Err(e) if matches!(e.downcast_ref::<ExecError>(), Some(ExecError::Failed { .. })) => {
                debug!("move"; "git mv failed, renaming: {}", e);
            }
            Err(e) => return Err(e),
        }
    }
    fs::rename(from, to)
        .with_context(|| format!("failed to move {} to {}", from.display(), to.display()))
}

/// Relocate the local images of the page now at `dest` and rewrite its
/// references. Returns the number of rewritten references.
fn move_images(
    config: &SweepConfig,
    src: &Path,
    dest: &Path,
    images_dir: &str,
    use_git: bool,
) -> Result<usize> {
    let root = config.root();
    let text =
        fs::read_to_string(dest).with_context(|| format!("failed to read {}", dest.display()))?;
    let old_dir = src.parent().unwrap_or(root);
    let new_dir = config.root_relative(dest.parent().unwrap_or(root));

    let mut replacements = BTreeMap::new();
    for image in extract_image_refs(&text) {
        if replacements.contains_key(&image.path) {
            continue;
        }
        let ImageTarget::Local(current) = resolve_image(&image.path, old_dir, root) else {
            continue;
        };
        let Some(name) = current.file_name() else {
            continue;
        };
        let target_rel = format!("{}/{}", images_dir, name.to_string_lossy());
        let target = config.root_join(&target_rel);

        if current.is_file() && current != target {
            if target.exists() {
                log!("warning"; "{} already exists, {} left in place", target_rel, config.root_relative(&current));
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                move_path(root, &current, &target, use_git)?;
                debug!("images"; "{} -> {}", config.root_relative(&current), target_rel);
            }
        } else if !target.is_file() {
            log!("warning"; "line {}: image `{}` not found", image.line, image.path);
            continue;
        }

        let rewritten = if image.path.starts_with('/') {
            format!("/{target_rel}")
        } else {
            relative_from(&new_dir, &target_rel)
        };
        if rewritten != image.path {
            replacements.insert(image.path, rewritten);
        }
    }

    if replacements.is_empty() {
        return Ok(0);
    }

    debug_do! {
        for (old, new) in &replacements {
            debug!("images"; "{} -> {}", old, new);
        }
    }

    let mut updated = text;
    for (old, new) in &replacements {
        updated = replace_reference(&updated, old, new);
    }
    fs::write(dest, updated).with_context(|| format!("failed to write {}", dest.display()))?;
    Ok(replacements.len())
}

/// Replace `old` where it appears as a whole quoted or parenthesized path.
fn replace_reference(text: &str, old: &str, new: &str) -> String {
    let pattern = format!(r#"([("']){}([)"'\s#?])"#, regex::escape(old));
    match Regex::new(&pattern) {
        Ok(re) => re
            .replace_all(text, |caps: &regex::Captures| {
                format!("{}{}{}", &caps[1], new, &caps[2])
            })
            .into_owned(),
        Err(_) => text.to_string(),
    }
}
