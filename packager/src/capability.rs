//! The capability surface exposed by the compiled module.
//!
//! The structure-analysis functions themselves live in the compiled binary
//! and are opaque to the packager. Only their declared shapes are known:
//! every operation takes the raw bytes of a structure file and returns
//! identifiers in one of a few fixed layouts.

/// Shape of the value an operation returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnShape {
    /// An ordered sequence of identifiers.
    IdentifierList,
    /// A mapping from identifier to an ordered sequence of identifiers.
    IdentifierMap,
    /// An ordered sequence of identifier pairs.
    IdentifierPairs,
}

impl ReturnShape {
    /// Return the TypeScript spelling of the shape.
    #[must_use]
    pub const fn typescript(self) -> &'static str {
        match self {
            Self::IdentifierList => "string[]",
            Self::IdentifierMap => "Map<string, string[]>",
            Self::IdentifierPairs => "string[][]",
        }
    }
}

/// One operation on the capability object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityOperation {
    /// Exported method name.
    pub name: &'static str,
    /// Shape of the returned value.
    pub returns: ReturnShape,
}

/// The full surface: an asynchronous initializer plus one capability object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySurface {
    /// Name of the asynchronous module initializer.
    pub initializer: &'static str,
    /// Name of the exported capability class.
    pub object: &'static str,
    /// Operations exposed by the capability class.
    pub operations: &'static [CapabilityOperation],
}

/// Type of the single argument every operation accepts.
pub const BYTE_BUFFER_TYPE: &str = "Uint8Array";

const PDB_HANDLER_OPERATIONS: &[CapabilityOperation] = &[
    CapabilityOperation {
        name: "list_chains",
        returns: ReturnShape::IdentifierList,
    },
    CapabilityOperation {
        name: "list_unknown_residues",
        returns: ReturnShape::IdentifierMap,
    },
    CapabilityOperation {
        name: "guess_moltype",
        returns: ReturnShape::IdentifierMap,
    },
    CapabilityOperation {
        name: "list_residues",
        returns: ReturnShape::IdentifierMap,
    },
    CapabilityOperation {
        name: "chains_in_contact",
        returns: ReturnShape::IdentifierPairs,
    },
];

/// Surface of the structure-file handler module.
pub const PDB_HANDLER_SURFACE: CapabilitySurface = CapabilitySurface {
    initializer: "init",
    object: "PdbHandlerApi",
    operations: PDB_HANDLER_OPERATIONS,
};

impl CapabilitySurface {
    /// Look up an operation by name.
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&CapabilityOperation> {
        self.operations.iter().find(|op| op.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn handler_surface_exposes_five_operations() {
        assert_eq!(PDB_HANDLER_SURFACE.operations.len(), 5);
        assert_eq!(PDB_HANDLER_SURFACE.initializer, "init");
    }

    #[rstest]
    #[case("list_chains", ReturnShape::IdentifierList)]
    #[case("list_unknown_residues", ReturnShape::IdentifierMap)]
    #[case("guess_moltype", ReturnShape::IdentifierMap)]
    #[case("list_residues", ReturnShape::IdentifierMap)]
    #[case("chains_in_contact", ReturnShape::IdentifierPairs)]
    fn operations_have_declared_shapes(#[case] name: &str, #[case] shape: ReturnShape) {
        let op = PDB_HANDLER_SURFACE
            .operation(name)
            .expect("operation should exist");
        assert_eq!(op.returns, shape);
    }

    #[test]
    fn unknown_operation_is_absent() {
        assert!(PDB_HANDLER_SURFACE.operation("parse_mmcif").is_none());
    }
}
