//! Flow classification: mapping a flow to the logical endpoint that
//! produced it, and deciding whether the flow is in scope at all.

use crate::flow::FlowSnapshot;
use std::{collections::HashMap, net::IpAddr};

/// Maps source endpoints to human-readable labels and filters out
/// everything else.
///
/// Only flows whose *source* address has been registered are in scope
/// for reporting; all other flows are ignored entirely: no state is
/// kept for them and nothing is emitted. This is a closed, small
/// enumeration, not a routing table: a new endpoint becomes visible
/// only through an explicit [`register`](Classifier::register) call.
///
/// # Example
///
/// ```
/// # use flowmon_core::{classify::Classifier, flow::FlowSnapshot};
/// # use std::net::{IpAddr, Ipv4Addr};
/// let ap1 = IpAddr::V4(Ipv4Addr::new(10, 1, 3, 1));
/// let sink = IpAddr::V4(Ipv4Addr::new(10, 1, 2, 2));
///
/// let mut classifier = Classifier::new();
/// classifier.register(ap1, "AP1 (helper)");
///
/// let known = FlowSnapshot::empty(ap1, sink);
/// assert_eq!(classifier.classify(&known), Some("AP1 (helper)"));
///
/// // reverse direction originates at the sink: out of scope
/// let reverse = FlowSnapshot::empty(sink, ap1);
/// assert_eq!(classifier.classify(&reverse), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    sources: HashMap<IpAddr, String>,
}

impl Classifier {
    /// An empty classifier. Until sources are registered, every flow
    /// is out of scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an originating endpoint with its label.
    ///
    /// Re-registering a source replaces its label.
    pub fn register(&mut self, source: IpAddr, label: impl Into<String>) -> &mut Self {
        self.sources.insert(source, label.into());
        self
    }

    /// The label for this flow, or `None` when the flow's source
    /// endpoint is unknown and the flow is out of scope.
    pub fn classify(&self, flow: &FlowSnapshot) -> Option<&str> {
        self.sources.get(&flow.source).map(String::as_str)
    }

    /// Whether the flow's source endpoint has been registered.
    pub fn is_in_scope(&self, flow: &FlowSnapshot) -> bool {
        self.sources.contains_key(&flow.source)
    }

    /// Number of registered endpoints.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const AP1: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 1, 3, 1));
    const AP2: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 1, 5, 1));
    const SINK: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 1, 2, 2));

    fn classifier() -> Classifier {
        let mut classifier = Classifier::new();
        classifier
            .register(AP1, "AP1 (helper)")
            .register(AP2, "AP2 (apps)");
        classifier
    }

    #[test]
    fn known_sources_get_their_label() {
        let classifier = classifier();

        let flow1 = FlowSnapshot::empty(AP1, SINK);
        let flow2 = FlowSnapshot::empty(AP2, SINK);

        assert_eq!(classifier.classify(&flow1), Some("AP1 (helper)"));
        assert_eq!(classifier.classify(&flow2), Some("AP2 (apps)"));
    }

    #[test]
    fn unknown_source_is_out_of_scope() {
        let classifier = classifier();

        let stray = FlowSnapshot::empty(SINK, AP1);

        assert_eq!(classifier.classify(&stray), None);
        assert!(!classifier.is_in_scope(&stray));
    }

    /// The destination address never makes a flow in scope; only the
    /// source identity counts.
    #[test]
    fn destination_does_not_classify() {
        let classifier = classifier();

        let towards_ap1 = FlowSnapshot::empty(SINK, AP1);

        assert!(!classifier.is_in_scope(&towards_ap1));
    }

    #[test]
    fn reregistering_replaces_the_label() {
        let mut classifier = classifier();
        classifier.register(AP1, "renamed");

        let flow = FlowSnapshot::empty(AP1, SINK);

        assert_eq!(classifier.classify(&flow), Some("renamed"));
        assert_eq!(classifier.len(), 2);
    }

    #[test]
    fn empty_classifier_excludes_everything() {
        let classifier = Classifier::new();

        assert!(classifier.is_empty());
        assert!(!classifier.is_in_scope(&FlowSnapshot::empty(AP1, SINK)));
    }
}
