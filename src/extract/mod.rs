// src/extract/mod.rs
// =============================================================================
// This module turns a fetched page into the list of third-party domains it
// loads resources from.
//
// Submodules:
// - html: Tag tree abstraction and the domain extraction rules
// =============================================================================

mod html;

pub use html::{
    authority_host, extract_third_party_domains, third_party_domains, HtmlTree, TagNode, TagTree,
};
