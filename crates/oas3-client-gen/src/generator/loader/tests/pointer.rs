use crate::{error::ErrorKind, generator::loader::pointer::Pointer};

#[test]
fn test_local_reference_stays_in_base_document() {
  let pointer = Pointer::parse_ref("#/components/schemas/Pet", "").expect("valid ref");
  assert_eq!(pointer, Pointer::component("Pet"));
  assert_eq!(pointer.to_string(), "#/components/schemas/Pet");
  assert!(!pointer.is_external());
  assert_eq!(pointer.component_name().as_deref(), Some("Pet"));

  let nested = Pointer::parse_ref("#/definitions/Owner", "schemas/pets.yaml").expect("valid ref");
  assert_eq!(nested.document(), "schemas/pets.yaml");
  assert_eq!(nested.fragment(), "/definitions/Owner");
}

#[test]
fn test_relative_documents_are_normalized() {
  let cases = [
    ("common.yaml#/Error", "", "common.yaml"),
    ("./common.yaml#/Error", "", "common.yaml"),
    ("../shared/common.yaml#/Error", "api/v1/root.yaml", "api/shared/common.yaml"),
    ("types.json#/Id", "schemas/pets.yaml", "schemas/types.json"),
    (
      "other.yaml#/X",
      "https://example.com/specs/api.yaml",
      "https://example.com/specs/other.yaml",
    ),
    (
      "https://example.com/a/../b.yaml#/X",
      "",
      "https://example.com/b.yaml",
    ),
  ];

  for (raw, base, expected) in cases {
    let pointer = Pointer::parse_ref(raw, base).expect("valid ref");
    assert_eq!(pointer.document(), expected, "ref {raw} from {base}");
  }
}

#[test]
fn test_url_documents_follow_rfc_3986() {
  let base = "https://example.com/specs/v1/api.yaml?rev=2";
  let cases = [
    ("/shared/common.yaml#/X", "https://example.com/shared/common.yaml"),
    ("../../../../top.yaml#/X", "https://example.com/top.yaml"),
    ("//cdn.example.org/types.yaml#/X", "https://cdn.example.org/types.yaml"),
    ("./types.yaml?rev=3#/X", "https://example.com/specs/v1/types.yaml?rev=3"),
    ("HTTPS://Example.COM:443/a.yaml#/X", "https://example.com/a.yaml"),
  ];

  for (raw, expected) in cases {
    let pointer = Pointer::parse_ref(raw, base).expect("valid ref");
    assert_eq!(pointer.document(), expected, "ref {raw}");
    assert_eq!(pointer.fragment(), "/X");
  }
}

#[test]
fn test_absolute_file_paths_ignore_the_base_directory() {
  let pointer = Pointer::parse_ref("/srv/specs/common.yaml#/X", "api/root.yaml").expect("valid ref");
  assert_eq!(pointer.document(), "/srv/specs/common.yaml");
}

#[test]
fn test_malformed_url_is_an_unresolved_reference() {
  let err = Pointer::parse_ref("https://[::1/common.yaml#/X", "").expect_err("invalid host");
  assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
}

#[test]
fn test_fragment_is_percent_decoded_and_escaped_segments_survive() {
  let pointer = Pointer::parse_ref("#/paths/~1pets~1%7Bid%7D/get", "").expect("valid ref");
  assert_eq!(pointer.fragment(), "/paths/~1pets~1{id}/get");
  assert_eq!(
    pointer.segments().collect::<Vec<_>>(),
    vec!["paths".to_string(), "/pets/{id}".to_string(), "get".to_string()]
  );

  let child = Pointer::root().child("paths").child("/pets/{id}");
  assert_eq!(child.fragment(), "/paths/~1pets~1{id}");
  assert_eq!(child.last_segment().as_deref(), Some("/pets/{id}"));
}

#[test]
fn test_non_pointer_fragments_are_rejected() {
  let err = Pointer::parse_ref("#Pet", "").expect_err("anchors are not pointers");
  assert_eq!(err.kind(), ErrorKind::UnresolvedReference);
}

#[test]
fn test_component_name_only_for_direct_children() {
  let property = Pointer::component("Pet").child("properties").child("name");
  assert_eq!(property.component_name(), None);
  assert_eq!(Pointer::root().component_name(), None);
}
