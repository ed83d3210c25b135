//! Ambient type-declaration synthesis.
//!
//! When the toolchain did not emit a declaration file for the public package
//! name, a declaration describing the capability surface is written instead.
//! An existing file is never touched, whatever its content: the check is on
//! presence only, so a stale hand-edited declaration survives until it is
//! deleted.

use crate::capability::{BYTE_BUFFER_TYPE, CapabilitySurface};
use crate::error::{PackagerError, Result};
use crate::fs::FileSystem;
use crate::package_name::PackageName;
use camino::Utf8Path;

/// What the synthesizer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationOutcome {
    /// A declaration file was already present and was left untouched.
    AlreadyPresent,
    /// A declaration file was written.
    Synthesized,
}

/// Render the ambient module declaration for `package`.
///
/// # Examples
///
/// ```
/// use wasm_packager::capability::PDB_HANDLER_SURFACE;
/// use wasm_packager::declarations::render_declaration;
/// use wasm_packager::package_name::PackageName;
///
/// let name = PackageName::try_from("pdb-handler-wasm")?;
/// let text = render_declaration(&name, &PDB_HANDLER_SURFACE);
/// assert!(text.starts_with("declare module \"pdb-handler-wasm\" {"));
/// assert!(text.contains("list_chains(data: Uint8Array): string[];"));
/// # Ok::<(), wasm_packager::error::PackagerError>(())
/// ```
#[must_use]
pub fn render_declaration(package: &PackageName, surface: &CapabilitySurface) -> String {
    let methods: String = surface
        .operations
        .iter()
        .map(|op| {
            format!(
                "    {}(data: {BYTE_BUFFER_TYPE}): {};\n",
                op.name,
                op.returns.typescript()
            )
        })
        .collect();
    format!(
        concat!(
            "declare module \"{package}\" {{\n",
            "  export function {initializer}(): Promise<void>;\n",
            "  export class {object} {{\n",
            "{methods}",
            "  }}\n",
            "}}\n",
        ),
        package = package,
        initializer = surface.initializer,
        object = surface.object,
        methods = methods,
    )
}

/// Write the declaration for `package` into `out_dir` unless one exists.
///
/// # Errors
///
/// Returns [`PackagerError::DeclarationWriteFailed`] if the file cannot be
/// written.
pub fn ensure_declaration(
    fs: &dyn FileSystem,
    out_dir: &Utf8Path,
    package: &PackageName,
    surface: &CapabilitySurface,
) -> Result<DeclarationOutcome> {
    let path = out_dir.join(package.types_file());
    if fs.exists(&path) {
        log::debug!("keeping existing type declaration {path}");
        return Ok(DeclarationOutcome::AlreadyPresent);
    }

    let text = render_declaration(package, surface);
    fs.write_atomic(&path, text.as_bytes())
        .map_err(|source| PackagerError::DeclarationWriteFailed {
            path: path.clone(),
            source,
        })?;
    log::debug!("wrote type declaration {path}");
    Ok(DeclarationOutcome::Synthesized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::PDB_HANDLER_SURFACE;
    use crate::fs::MockFileSystem;
    use mockall::predicate::eq;

    fn package() -> PackageName {
        PackageName::try_from("pkg-name").expect("valid name")
    }

    #[test]
    fn rendered_declaration_matches_surface() {
        let text = render_declaration(&package(), &PDB_HANDLER_SURFACE);
        let expected = concat!(
            "declare module \"pkg-name\" {\n",
            "  export function init(): Promise<void>;\n",
            "  export class PdbHandlerApi {\n",
            "    list_chains(data: Uint8Array): string[];\n",
            "    list_unknown_residues(data: Uint8Array): Map<string, string[]>;\n",
            "    guess_moltype(data: Uint8Array): Map<string, string[]>;\n",
            "    list_residues(data: Uint8Array): Map<string, string[]>;\n",
            "    chains_in_contact(data: Uint8Array): string[][];\n",
            "  }\n",
            "}\n",
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn surface_without_operations_renders_empty_class() {
        let surface = CapabilitySurface {
            initializer: "start",
            object: "Empty",
            operations: &[],
        };
        let text = render_declaration(&package(), &surface);
        assert_eq!(
            text,
            concat!(
                "declare module \"pkg-name\" {\n",
                "  export function start(): Promise<void>;\n",
                "  export class Empty {\n",
                "  }\n",
                "}\n",
            )
        );
    }

    #[test]
    fn existing_declaration_is_not_rewritten() {
        let mut fs = MockFileSystem::new();
        fs.expect_exists()
            .with(eq(Utf8Path::new("pkg/pkg_name.d.ts")))
            .return_const(true);
        fs.expect_write_atomic().never();

        let outcome = ensure_declaration(&fs, Utf8Path::new("pkg"), &package(), &PDB_HANDLER_SURFACE)
            .expect("synthesis succeeds");
        assert_eq!(outcome, DeclarationOutcome::AlreadyPresent);
    }

    #[test]
    fn missing_declaration_is_written() {
        let mut fs = MockFileSystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_write_atomic()
            .withf(|path, contents| {
                path == Utf8Path::new("pkg/pkg_name.d.ts")
                    && contents.starts_with(b"declare module \"pkg-name\"")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = ensure_declaration(&fs, Utf8Path::new("pkg"), &package(), &PDB_HANDLER_SURFACE)
            .expect("synthesis succeeds");
        assert_eq!(outcome, DeclarationOutcome::Synthesized);
    }

    #[test]
    fn write_errors_are_reported() {
        let mut fs = MockFileSystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_write_atomic()
            .returning(|_, _| Err(std::io::Error::other("read-only file system")));

        let err = ensure_declaration(&fs, Utf8Path::new("pkg"), &package(), &PDB_HANDLER_SURFACE)
            .expect_err("write should fail");
        assert!(matches!(err, PackagerError::DeclarationWriteFailed { .. }));
    }
}
