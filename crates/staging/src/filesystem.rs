//! Filesystem operations used by staging and listing.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// `mkdir -p`: creates every missing component, succeeds if already present.
pub async fn create_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
    fs::create_dir_all(path.as_ref()).await
}

/// `cp -r src dst_parent`: the tree under `src` is merged into
/// `dst_parent/<name of src>`, overwriting files that already exist there.
/// Symlinks inside the tree are copied as symlinks. Returns the destination root.
pub async fn copy_dir_into<P, Q>(src: P, dst_parent: Q) -> io::Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let src = src.as_ref();
    let name = src.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("source has no final component: {}", src.display()),
        )
    })?;
    let dst = dst_parent.as_ref().join(name);

    copy_dir_all(src, &dst).await?;
    Ok(dst)
}

/// Recursively copy the contents of `src` into `dst`, creating `dst` if needed.
pub async fn copy_dir_all<P, Q>(src: P, dst: Q) -> io::Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let src = src.as_ref();
    if !fs::metadata(src).await?.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("source is not a directory: {}", src.display()),
        ));
    }

    let mut pending = vec![(src.to_path_buf(), dst.as_ref().to_path_buf())];

    while let Some((from_dir, to_dir)) = pending.pop() {
        fs::create_dir_all(&to_dir).await?;

        let mut entries = fs::read_dir(&from_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let from = entry.path();
            let to = to_dir.join(entry.file_name());

            let file_type = entry.file_type().await?;
            if file_type.is_symlink() {
                copy_symlink(&from, &to).await?;
            } else if file_type.is_dir() {
                pending.push((from, to));
            } else {
                remove_if_symlink(&to).await?;
                fs::copy(&from, &to).await?;
                ensure_owner_writable(&to).await?;
            }
        }
    }

    Ok(())
}

/// Recreate the link at `to` with the same target, like `cp -r` does. The
/// target is not resolved, so dangling links and links back up the tree are
/// copied as they are.
#[cfg(unix)]
async fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    let target = fs::read_link(from).await?;

    match fs::symlink_metadata(to).await {
        Ok(existing) if existing.is_dir() => fs::remove_dir_all(to).await?,
        Ok(_) => fs::remove_file(to).await?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    fs::symlink(&target, to).await
}

#[cfg(not(unix))]
async fn copy_symlink(_from: &Path, _to: &Path) -> io::Result<()> {
    Ok(())
}

/// A link left by an earlier merge must not redirect a file copy elsewhere.
async fn remove_if_symlink(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path).await {
        Ok(existing) if existing.file_type().is_symlink() => fs::remove_file(path).await,
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Copies inherit the source mode; a read-only layer must not leave read-only
/// files in the writable area, or the next merge fails to overwrite them.
#[cfg(unix)]
async fn ensure_owner_writable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path).await?.permissions();
    let mode = permissions.mode();
    if mode & 0o200 == 0 {
        permissions.set_mode(mode | 0o200);
        fs::set_permissions(path, permissions).await?;
    }
    Ok(())
}

#[cfg(not(unix))]
async fn ensure_owner_writable(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Names of the immediate subdirectories of `path`, in enumeration order.
/// Other entry types are skipped; symlinks are not followed.
pub async fn list_subdirectories<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    let mut dir = fs::read_dir(path.as_ref()).await?;

    while let Some(entry) = dir.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_create_dir_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b").join("c");

        create_dir(&nested).await.unwrap();
        create_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_copy_dir_into_nests_under_source_name() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("GAMConfig");
        std::fs::create_dir_all(src.join("clients").join("acme")).unwrap();
        std::fs::write(src.join("gam.cfg"), "[DEFAULT]\n").unwrap();
        std::fs::write(src.join("clients").join("acme").join("oauth2.txt"), "token").unwrap();

        let parent = temp.path().join("resources");
        std::fs::create_dir_all(&parent).unwrap();

        let dst = copy_dir_into(&src, &parent).await.unwrap();

        assert_eq!(dst, parent.join("GAMConfig"));
        assert_eq!(std::fs::read_to_string(dst.join("gam.cfg")).unwrap(), "[DEFAULT]\n");
        assert_eq!(
            std::fs::read_to_string(dst.join("clients").join("acme").join("oauth2.txt")).unwrap(),
            "token"
        );
    }

    #[tokio::test]
    async fn test_copy_merges_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::create_dir_all(&dst).unwrap();
        std::fs::write(src.join("shared.txt"), "new").unwrap();
        std::fs::write(dst.join("shared.txt"), "old").unwrap();
        std::fs::write(dst.join("extra.txt"), "kept").unwrap();

        copy_dir_all(&src, &dst).await.unwrap();

        assert_eq!(std::fs::read_to_string(dst.join("shared.txt")).unwrap(), "new");
        assert_eq!(std::fs::read_to_string(dst.join("extra.txt")).unwrap(), "kept");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_read_only_source_can_be_copied_twice() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        std::fs::create_dir_all(&src).unwrap();
        let file = src.join("gam.cfg");
        std::fs::write(&file, "cfg").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o444)).unwrap();

        copy_dir_all(&src, &dst).await.unwrap();
        copy_dir_all(&src, &dst).await.unwrap();

        let mode = std::fs::metadata(dst.join("gam.cfg")).unwrap().permissions().mode();
        assert_ne!(mode & 0o200, 0);
    }

    #[tokio::test]
    async fn test_copy_missing_source_fails() {
        let temp = TempDir::new().unwrap();
        let result = copy_dir_all(temp.path().join("missing"), temp.path().join("dst")).await;
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_copy_file_source_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain");
        std::fs::write(&file, "x").unwrap();

        let result = copy_dir_all(&file, temp.path().join("dst")).await;
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_list_subdirectories_skips_files() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("acme")).unwrap();
        std::fs::create_dir(temp.path().join("globex")).unwrap();
        std::fs::write(temp.path().join("README"), "not a client").unwrap();

        let mut names = list_subdirectories(temp.path()).await.unwrap();
        names.sort();
        assert_eq!(names, vec!["acme", "globex"]);
    }

    #[tokio::test]
    async fn test_list_subdirectories_missing_dir() {
        let temp = TempDir::new().unwrap();
        assert!(list_subdirectories(temp.path().join("nope")).await.is_err());
    }
}
