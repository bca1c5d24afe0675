// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The parse-time DOM.
//!
//! [`RawDom`] exists purely within the parsing process: html5ever
//! appends into it through the `TreeSink` implementation in
//! `rawdom_creator`. All nodes live in one arena owned by the dom and
//! refer to each other by handle; the arena may hold garbage nodes that
//! the tree builder created and abandoned, which the conversion step
//! simply never visits.

use html5ever::tree_builder::ElementFlags;
use html5ever::{namespace_url, ns, Attribute, LocalName, QualName};

/// Index of a node in the [`RawDom`] arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawHandle(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RawDocument {
    pub(crate) children: Vec<RawHandle>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RawElement {
    pub(crate) name: QualName,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<RawHandle>,
}

impl RawElement {
    pub(crate) fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _v)| n == name)
            .map(|(_n, v)| v.as_str())
    }

    /// Local tag name, lowercased by the tokenizer.
    pub(crate) fn tag(&self) -> &str {
        self.name.local.as_ref()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RawText {
    pub(crate) content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum RawNode {
    Document(RawDocument),
    Element(RawElement),
    Text(RawText),
}

impl RawNode {
    pub(crate) fn name(&self) -> &QualName {
        match self {
            Self::Element(element) => &element.name,
            _ => panic!("Only elements have a qualified name"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct RawDom {
    pub(crate) nodes: Vec<RawNode>,
    pub(crate) document_handle: RawHandle,
}

impl RawDom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![RawNode::Document(RawDocument {
                children: Vec::new(),
            })],
            document_handle: RawHandle(0),
        }
    }

    pub(crate) fn document_handle(&self) -> &RawHandle {
        &self.document_handle
    }

    pub(crate) fn document(&self) -> &RawDocument {
        match self.get_node(&self.document_handle) {
            RawNode::Document(document) => document,
            _ => panic!("Document handle does not point at a document"),
        }
    }

    pub(crate) fn get_node(&self, handle: &RawHandle) -> &RawNode {
        &self.nodes[handle.0]
    }

    pub(crate) fn get_mut_node(&mut self, handle: &RawHandle) -> &mut RawNode {
        &mut self.nodes[handle.0]
    }

    pub(crate) fn add_node(&mut self, node: RawNode) -> RawHandle {
        self.nodes.push(node);
        RawHandle(self.nodes.len() - 1)
    }

    pub(crate) fn create_element(
        &mut self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> RawHandle {
        let attrs = attrs
            .iter()
            .map(|attr| {
                (
                    attr.name.local.as_ref().to_owned(),
                    attr.value.as_ref().to_owned(),
                )
            })
            .collect();
        self.add_node(RawNode::Element(RawElement {
            name,
            attrs,
            children: Vec::new(),
        }))
    }
}

pub(crate) fn raw_qual_name(name: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(name))
}
