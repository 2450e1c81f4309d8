//! Symbol namer: deterministic encoding of a member identity into a flat
//! lookup key.
//!
//! The code-generation collaborator registers each body factory under a key
//! produced by these functions, and the resolver reproduces the same key at
//! expansion time; the two sides never exchange anything richer than the
//! string. The encoding is collision-resistant across legitimate distinct
//! inputs because the fixed delimiters (`_`, `` ` ``, `_P{i}_`) never survive
//! sanitization inside a fragment.
//!
//! Pure functions, no state.
//!
//! # Examples
//!
//! ```
//! use veneer_core::{TypeRef, TypeSegment};
//! use veneer_engine::namer;
//!
//! let namespace = vec!["App".to_string()];
//! let path = vec![TypeSegment::new("Order", 0)];
//! let name = namer::generate_name(&namespace, &path, "Total", None);
//! assert_eq!(name, "App_Order_Total");
//!
//! // Overloads get positional parameter fragments
//! let with_params = namer::generate_name(
//!     &namespace,
//!     &path,
//!     "Calculate",
//!     Some(&[TypeRef::int()]),
//! );
//! assert_eq!(with_params, "App_Order_Calculate_P0_int");
//! ```

use veneer_core::{TypeRef, TypeSegment};

/// Key-space prefix shared with the code-generation collaborator.
pub const GENERATED_NAMESPACE: &str = "veneer::generated";

/// Encode a member identity without the generated-namespace prefix.
///
/// `parameter_types` is supplied only for methods, to disambiguate
/// overloads; pass `None` for properties.
pub fn generate_name(
    namespace: &[String],
    path: &[TypeSegment],
    member_name: &str,
    parameter_types: Option<&[TypeRef]>,
) -> String {
    let mut out = String::new();
    generate_name_into(&mut out, namespace, path, member_name, parameter_types);
    out
}

/// Encode a member identity with the generated-namespace prefix. This is the
/// form used as a factory-table key.
pub fn generate_full_name(
    namespace: &[String],
    path: &[TypeSegment],
    member_name: &str,
    parameter_types: Option<&[TypeRef]>,
) -> String {
    let mut out = String::from(GENERATED_NAMESPACE);
    out.push_str("::");
    generate_name_into(&mut out, namespace, path, member_name, parameter_types);
    out
}

fn generate_name_into(
    out: &mut String,
    namespace: &[String],
    path: &[TypeSegment],
    member_name: &str,
    parameter_types: Option<&[TypeRef]>,
) {
    for (i, ns) in namespace.iter().enumerate() {
        if i > 0 {
            out.push('_');
        }
        out.push_str(ns);
    }
    out.push('_');

    // Enclosing type names outer-to-inner; arity accumulates across the path
    // and is emitted once, after the member name.
    let mut arity = 0;
    for seg in path {
        arity += seg.arity;
        out.push_str(&seg.name);
        out.push('_');
    }

    out.push_str(member_name);

    if arity > 0 {
        out.push('`');
        out.push_str(&arity.to_string());
    }

    if let Some(parameter_types) = parameter_types {
        for (index, param) in parameter_types.iter().enumerate() {
            out.push_str("_P");
            out.push_str(&index.to_string());
            out.push('_');
            out.push_str(&sanitize_type_name(&type_name(param)));
        }
    }
}

/// Fully-qualified name of a parameter type as it participates in the key.
///
/// Open generic parameters encode by name so that the generic definition's
/// factory is found regardless of later closure; arrays encode element type
/// plus a rank marker.
fn type_name(ty: &TypeRef) -> String {
    ty.to_string()
}

/// Replace every character that is not valid in the target identifier syntax
/// with `_`.
fn sanitize_type_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ':' | '<' | '>' | ',' | ' ' | '[' | ']' | '`' | '?' | '.' => '_',
            other => other,
        })
        .collect()
}
