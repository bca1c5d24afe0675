// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The html5ever `TreeSink` that assembles a [`RawDom`].

use std::cell::{Ref, RefCell};

use html5ever::interface::NextParserState;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_fragment, Attribute, QualName};

use super::rawdom::{
    raw_qual_name, RawDom, RawHandle, RawNode, RawText,
};
use crate::html::parse_error::HtmlParseError;

pub(crate) struct RawDomCreator {
    state: RefCell<RawDomCreation>,
}

struct RawDomCreation {
    dom: RawDom,
    parse_errors: Vec<String>,
}

impl RawDomCreator {
    pub(crate) fn parse(html: &str) -> Result<RawDom, HtmlParseError> {
        parse_fragment(
            RawDomCreator::default(),
            Default::default(),
            raw_qual_name(""),
            vec![],
        )
        .from_utf8()
        .one(html.as_bytes())
    }
}

impl Default for RawDomCreator {
    fn default() -> Self {
        Self {
            state: RefCell::new(RawDomCreation {
                dom: RawDom::new(),
                parse_errors: Vec::new(),
            }),
        }
    }
}

impl TreeSink for RawDomCreator {
    type Handle = RawHandle;
    type Output = Result<RawDom, HtmlParseError>;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        let state = self.state.into_inner();
        if state.parse_errors.is_empty() {
            Ok(state.dom)
        } else {
            Err(HtmlParseError {
                parse_errors: state.parse_errors,
            })
        }
    }

    fn parse_error(&self, msg: std::borrow::Cow<'static, str>) {
        self.state.borrow_mut().parse_errors.push(String::from(msg));
    }

    fn get_document(&self) -> Self::Handle {
        self.state.borrow().dom.document_handle().clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.state.borrow(), |state| {
            state.dom.get_node(target).name()
        })
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        self.state
            .borrow_mut()
            .dom
            .create_element(name, attrs, flags)
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        // Comments carry nothing we keep. Allocate an empty text node in
        // the arena; if the builder attaches it, conversion skips it.
        self.state.borrow_mut().dom.add_node(RawNode::Text(RawText {
            content: String::new(),
        }))
    }

    fn create_pi(
        &self,
        _target: StrTendril,
        _data: StrTendril,
    ) -> Self::Handle {
        todo!("create_pi not yet supported")
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let dom = &mut self.state.borrow_mut().dom;
        match child {
            NodeOrText::AppendNode(child) => match dom.get_mut_node(parent) {
                RawNode::Element(p) => p.children.push(child),
                RawNode::Document(p) => p.children.push(child),
                RawNode::Text(_) => {
                    panic!("Appending node to text! {:?}", parent)
                }
            },
            NodeOrText::AppendText(tendril) => {
                // Coalesce with a trailing text sibling when there is one.
                let text_handle = match dom.get_node(parent) {
                    RawNode::Document(_) => None,
                    RawNode::Text(_) => Some(parent.clone()),
                    RawNode::Element(element) => match element
                        .children
                        .last()
                        .map(|handle| (handle, dom.get_node(handle)))
                    {
                        Some((last_child_handle, RawNode::Text(_))) => {
                            Some(last_child_handle.clone())
                        }
                        _ => None,
                    },
                };

                if let Some(text_handle) = text_handle {
                    if let RawNode::Text(p) = dom.get_mut_node(&text_handle) {
                        p.content += tendril.as_ref();
                    } else {
                        unreachable!(
                            "`text_handle` must map to a `RawNode::Text`"
                        )
                    }
                } else {
                    let new_handle = dom.add_node(RawNode::Text(RawText {
                        content: tendril.as_ref().to_owned(),
                    }));

                    match dom.get_mut_node(parent) {
                        RawNode::Element(p) => p.children.push(new_handle),
                        RawNode::Document(p) => p.children.push(new_handle),
                        RawNode::Text(_) => {
                            panic!("parent changed from element to text!")
                        }
                    }
                }
            }
        };
    }

    fn append_based_on_parent_node(
        &self,
        _element: &Self::Handle,
        _prev_element: &Self::Handle,
        _child: NodeOrText<Self::Handle>,
    ) {
        todo!("append_based_on_parent_node not yet supported")
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        todo!("append_doctype_to_document not yet supported")
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {
        todo!()
    }

    fn pop(&self, _node: &Self::Handle) {
        // Nothing to do here for now
    }

    fn get_template_contents(&self, _target: &Self::Handle) -> Self::Handle {
        todo!("get_template_contents not yet supported")
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {
        // Nothing to do here for now
    }

    fn append_before_sibling(
        &self,
        _sibling: &Self::Handle,
        _new_node: NodeOrText<Self::Handle>,
    ) {
        todo!("append_before_sibling not yet supported")
    }

    fn add_attrs_if_missing(
        &self,
        target: &Self::Handle,
        attrs: Vec<Attribute>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        let node = dom.get_mut_node(target);
        if let RawNode::Element(node) = node {
            let to_add: Vec<(String, String)> = attrs
                .iter()
                .filter_map(|attr| {
                    let attr_name = attr.name.local.as_ref();
                    if node.attrs.iter().any(|(name, _)| name == attr_name) {
                        None
                    } else {
                        Some((
                            attr_name.to_owned(),
                            attr.value.as_ref().to_owned(),
                        ))
                    }
                })
                .collect();
            node.attrs.extend(to_add);
        } else {
            panic!("Non-element passed to add_attrs_if_missing!");
        }
    }

    fn associate_with_form(
        &self,
        _target: &Self::Handle,
        _form: &Self::Handle,
        _nodes: (&Self::Handle, Option<&Self::Handle>),
    ) {
        todo!()
    }

    fn remove_from_parent(&self, _target: &Self::Handle) {
        todo!("remove_from_parent not yet supported")
    }

    fn reparent_children(
        &self,
        _node: &Self::Handle,
        _new_parent: &Self::Handle,
    ) {
        todo!("reparent_children not yet supported")
    }

    fn is_mathml_annotation_xml_integration_point(
        &self,
        _handle: &Self::Handle,
    ) -> bool {
        todo!("is_mathml_annotation_xml_integration_point not yet supported")
    }

    fn set_current_line(&self, _line_number: u64) {
        // Nothing to do here for now
    }

    fn complete_script(&self, _node: &Self::Handle) -> NextParserState {
        todo!("complete_script not yet supported")
    }

    fn allow_declarative_shadow_roots(
        &self,
        _intended_parent: &Self::Handle,
    ) -> bool {
        false
    }

    fn attach_declarative_shadow(
        &self,
        _location: &Self::Handle,
        _template: &Self::Handle,
        _attrs: Vec<Attribute>,
    ) -> Result<(), String> {
        todo!("attach_declarative_shadow not yet supported")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parser::rawdom::RawElement;

    fn element<'a>(dom: &'a RawDom, handle: &RawHandle) -> &'a RawElement {
        match dom.get_node(handle) {
            RawNode::Element(element) => element,
            node => panic!("expected an element, got {node:?}"),
        }
    }

    #[test]
    fn parsing_plain_text_yields_a_text_child() {
        let dom = RawDomCreator::parse("some text").expect("parse succeeds");
        // Fragment parsing wraps everything in a synthetic <html> root.
        let root = element(&dom, &dom.document().children[0]);
        assert_eq!(root.tag(), "html");
        let text = dom.get_node(&root.children[0]);
        assert_eq!(
            text,
            &RawNode::Text(RawText {
                content: "some text".into()
            })
        );
    }

    #[test]
    fn parsing_an_element_keeps_its_attributes() {
        let dom = RawDomCreator::parse(r#"<a href="https://a">x</a>"#)
            .expect("parse succeeds");
        let root = element(&dom, &dom.document().children[0]);
        let anchor = element(&dom, &root.children[0]);
        assert_eq!(anchor.tag(), "a");
        assert_eq!(anchor.get_attr("href"), Some("https://a"));
    }

    #[test]
    fn adjacent_text_chunks_coalesce() {
        let dom =
            RawDomCreator::parse("a&amp;b").expect("parse succeeds");
        let root = element(&dom, &dom.document().children[0]);
        assert_eq!(root.children.len(), 1);
        assert_eq!(
            dom.get_node(&root.children[0]),
            &RawNode::Text(RawText {
                content: "a&b".into()
            })
        );
    }
}
