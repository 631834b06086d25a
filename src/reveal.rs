use crate::dom::{Dom, NodeId};

pub(crate) const REVEAL_THRESHOLD: f64 = 0.1;
pub(crate) const REVEAL_ROOT_MARGIN_BOTTOM: i64 = -50;

// Watches registered elements and reports the ones whose visible share of the
// viewport window reaches the threshold. Elements without a layout box are
// skipped until the harness assigns one.
#[derive(Debug, Clone)]
pub(crate) struct RevealObserver {
    threshold: f64,
    root_margin_bottom: i64,
    targets: Vec<NodeId>,
}

impl RevealObserver {
    pub(crate) fn new() -> Self {
        Self {
            threshold: REVEAL_THRESHOLD,
            root_margin_bottom: REVEAL_ROOT_MARGIN_BOTTOM,
            targets: Vec::new(),
        }
    }

    pub(crate) fn observe(&mut self, node: NodeId) {
        if !self.targets.contains(&node) {
            self.targets.push(node);
        }
    }

    pub(crate) fn intersecting(
        &self,
        dom: &Dom,
        scroll_y: i64,
        viewport_height: i64,
    ) -> Vec<NodeId> {
        let view_top = scroll_y;
        let view_bottom = scroll_y + viewport_height + self.root_margin_bottom;
        if view_bottom <= view_top {
            return Vec::new();
        }

        let mut out = Vec::new();
        for node in &self.targets {
            if !dom.is_connected(*node) {
                continue;
            }
            let Some(element) = dom.element(*node) else {
                continue;
            };
            if element.offset_height == 0 {
                continue;
            }
            let ratio = intersection_ratio(
                element.offset_top,
                element.offset_height,
                view_top,
                view_bottom,
            );
            if ratio >= self.threshold {
                out.push(*node);
            }
        }
        out
    }
}

fn intersection_ratio(top: i64, height: i64, view_top: i64, view_bottom: i64) -> f64 {
    let bottom = top + height;
    let overlap = view_bottom.min(bottom) - view_top.max(top);
    if overlap <= 0 {
        return 0.0;
    }
    overlap as f64 / height as f64
}
