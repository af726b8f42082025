use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;

use crate::codec;
use crate::error::{InvertError, Result};
use crate::invert;
use crate::paths::{self, DirStatus, OutputTarget};

pub struct AppConfig {
    pub root: PathBuf,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub inverted: usize,
    pub skipped: usize,
}

/// Walks the root directory and inverts every JPEG/PNG found under it,
/// one file at a time. The first error ends the run.
pub struct App {
    root: PathBuf,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        if config.root.exists() && !config.root.is_dir() {
            return Err(InvertError::NotADirectory(config.root.clone()));
        }

        Ok(Self {
            root: config.root.clone(),
        })
    }

    pub fn run(&self) -> Result<RunStats> {
        let mut stats = RunStats::default();
        let output_dir = paths::output_dir(&self.root);

        // Results from this or an earlier run must not be fed back in.
        let walker = WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|entry| entry.path() != output_dir);

        for entry in walker {
            let entry = entry?;
            let file_type = entry.file_type();
            // Symlinks are not followed into directories, but a link to an
            // image is inverted like the file it points at.
            let is_file =
                file_type.is_file() || (file_type.is_symlink() && entry.path().is_file());

            if file_type.is_dir() {
                debug!("Descending into {}", entry.path().display());
            } else if is_file && paths::is_image_file(entry.path()) {
                process_file(&self.root, entry.path())?;
                stats.inverted += 1;
            } else {
                info!(
                    "Skipping {} file in {} dir",
                    entry.file_name().to_string_lossy(),
                    self.root.display()
                );
                stats.skipped += 1;
            }
        }

        info!(
            "Inverted {} image(s), skipped {} file(s)",
            stats.inverted, stats.skipped
        );
        Ok(stats)
    }
}

/// Invert a single image found under `root` into `root/inverted/`.
pub fn process_file(root: &Path, input: &Path) -> Result<OutputTarget> {
    let target = OutputTarget::new(root, input);

    let (dir, status) = paths::ensure_output_dir(root)?;
    match status {
        DirStatus::Created => info!("Directory '{}' created successfully.", dir.display()),
        DirStatus::Existing => info!("Directory '{}' already exists.", dir.display()),
    }

    let img = codec::decode(&target.input)?;
    let inverted = invert::invert(&img);
    drop(img);

    let format = codec::encode(&inverted, &target.output)?;

    info!(
        "Inverted {} -> {} ({})",
        target.input.display(),
        target.output.display(),
        format.name()
    );
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;
    use tempfile::tempdir;

    fn write_png(path: &Path, px: [u8; 4]) {
        let img = RgbaImage::from_pixel(4, 4, Rgba(px));
        codec::encode(&img, path).unwrap();
    }

    fn run(root: &Path) -> Result<RunStats> {
        App::new(&AppConfig {
            root: root.to_path_buf(),
        })?
        .run()
    }

    #[test]
    fn test_only_images_are_processed() {
        let root = tempdir().unwrap();
        write_png(&root.path().join("a.png"), [10, 20, 30, 255]);
        fs::write(root.path().join("b.txt"), "hello").unwrap();

        let stats = run(root.path()).unwrap();

        assert_eq!(stats, RunStats { inverted: 1, skipped: 1 });
        let out = root.path().join("inverted").join("a_inverted.png");
        let img = codec::decode(&out).unwrap().to_rgba8();
        assert!(img.pixels().all(|p| p.0 == [245, 235, 225, 255]));
        assert!(!root.path().join("inverted").join("b_inverted.txt").exists());
    }

    #[test]
    fn test_nested_images_are_flattened() {
        let root = tempdir().unwrap();
        let sub = root.path().join("sub").join("deeper");
        fs::create_dir_all(&sub).unwrap();
        write_png(&sub.join("pic.png"), [0, 0, 0, 255]);
        write_png(&root.path().join("top.png"), [255, 255, 255, 128]);

        let stats = run(root.path()).unwrap();

        assert_eq!(stats.inverted, 2);
        let out_dir = root.path().join("inverted");
        let nested = codec::decode(&out_dir.join("pic_inverted.png")).unwrap().to_rgba8();
        assert_eq!(nested.get_pixel(0, 0).0, [255, 255, 255, 255]);
        let top = codec::decode(&out_dir.join("top_inverted.png")).unwrap().to_rgba8();
        assert_eq!(top.get_pixel(0, 0).0, [0, 0, 0, 128]);
        assert!(!sub.join("inverted").exists());
    }

    #[test]
    fn test_uppercase_jpeg_extension() {
        let root = tempdir().unwrap();
        let src = RgbaImage::from_pixel(8, 8, Rgba([200, 100, 50, 255]));
        codec::encode(&src, &root.path().join("PHOTO.JPG")).unwrap();

        let stats = run(root.path()).unwrap();

        assert_eq!(stats.inverted, 1);
        let out = root.path().join("inverted").join("PHOTO_inverted.JPG");
        let bytes = fs::read(&out).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);

        // Flat color survives JPEG round trips within a few levels
        let inverted = codec::decode(&out).unwrap().to_rgba8();
        for px in inverted.pixels() {
            let [r, g, b, a] = px.0;
            assert!(r.abs_diff(55) <= 3, "red {r}");
            assert!(g.abs_diff(155) <= 3, "green {g}");
            assert!(b.abs_diff(205) <= 3, "blue {b}");
            assert_eq!(a, 255);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_image_is_processed() {
        let root = tempdir().unwrap();
        let elsewhere = tempdir().unwrap();
        let target = elsewhere.path().join("real.png");
        write_png(&target, [10, 20, 30, 255]);
        std::os::unix::fs::symlink(&target, root.path().join("link.png")).unwrap();

        let stats = run(root.path()).unwrap();

        assert_eq!(stats, RunStats { inverted: 1, skipped: 0 });
        let out = root.path().join("inverted").join("link_inverted.png");
        let img = codec::decode(&out).unwrap().to_rgba8();
        assert!(img.pixels().all(|p| p.0 == [245, 235, 225, 255]));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let root = tempdir().unwrap();
        std::os::unix::fs::symlink(root.path().join("gone.png"), root.path().join("dead.png"))
            .unwrap();

        let stats = run(root.path()).unwrap();

        assert_eq!(stats, RunStats { inverted: 0, skipped: 1 });
    }

    #[test]
    fn test_repeated_runs_do_not_accumulate() {
        let root = tempdir().unwrap();
        write_png(&root.path().join("a.png"), [1, 2, 3, 255]);
        fs::write(root.path().join("notes.txt"), "x").unwrap();

        let app = App::new(&AppConfig {
            root: root.path().to_path_buf(),
        })
        .unwrap();
        let first = app.run().unwrap();
        let second = app.run().unwrap();

        assert_eq!(first, RunStats { inverted: 1, skipped: 1 });
        assert_eq!(second, first);
    }

    #[test]
    fn test_rerun_skips_output_dir() {
        let root = tempdir().unwrap();
        write_png(&root.path().join("a.png"), [1, 2, 3, 255]);
        write_png(&root.path().join("b.png"), [4, 5, 6, 255]);

        let first = run(root.path()).unwrap();
        let second = run(root.path()).unwrap();

        assert_eq!(first, second);
        let mut names: Vec<_> = fs::read_dir(root.path().join("inverted"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, ["a_inverted.png", "b_inverted.png"]);
    }

    #[test]
    fn test_process_file_round_trip() {
        let root = tempdir().unwrap();
        let src = RgbaImage::from_fn(5, 3, |x, y| Rgba([(x * 50) as u8, (y * 80) as u8, 7, 200]));
        let input = root.path().join("pic.png");
        codec::encode(&src, &input).unwrap();

        let once = process_file(root.path(), &input).unwrap();
        let twice = process_file(root.path(), &once.output).unwrap();

        assert_eq!(
            twice.output,
            root.path().join("inverted").join("pic_inverted_inverted.png")
        );
        assert_eq!(codec::decode(&twice.output).unwrap().to_rgba8(), src);
    }

    #[test]
    fn test_decode_failure_aborts_run() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("broken.png"), b"not a png").unwrap();

        let err = run(root.path()).unwrap_err();
        assert!(matches!(err, InvertError::Decode { .. }));
    }

    #[test]
    fn test_missing_root_is_walk_error() {
        let root = tempdir().unwrap();
        let err = run(&root.path().join("missing")).unwrap_err();
        assert!(matches!(err, InvertError::Walk(_)));
    }

    #[test]
    fn test_root_must_be_directory() {
        let root = tempdir().unwrap();
        let file = root.path().join("a.png");
        write_png(&file, [0, 0, 0, 255]);

        let err = run(&file).unwrap_err();
        assert!(matches!(err, InvertError::NotADirectory(_)));
    }

    #[test]
    fn test_empty_root() {
        let root = tempdir().unwrap();
        let stats = run(root.path()).unwrap();
        assert_eq!(stats, RunStats::default());
        assert!(!root.path().join("inverted").exists());
    }
}
