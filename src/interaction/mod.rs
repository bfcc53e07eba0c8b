//! Cross-chart interaction state.
//!
//! [`Syncer`] keeps axes of independent charts on the same domain: zooming a
//! master axis zooms every linked slave axis, and their dependents, in one
//! synchronous pass.

use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::api::Chart;
use crate::error::{ChartError, ChartResult};

pub type SharedChart = Rc<RefCell<Chart>>;

/// One directed master -> slave axis link.
#[derive(Debug, Clone)]
pub struct AxisLink {
    pub master: SharedChart,
    pub master_axis: String,
    pub slave: SharedChart,
    pub slave_axis: String,
}

impl AxisLink {
    fn matches(
        &self,
        master: &SharedChart,
        master_axis: &str,
        slave: &SharedChart,
        slave_axis: &str,
    ) -> bool {
        Rc::ptr_eq(&self.master, master)
            && self.master_axis == master_axis
            && Rc::ptr_eq(&self.slave, slave)
            && self.slave_axis == slave_axis
    }
}

/// Clears the re-entrancy flag when dropped, error paths included.
struct SyncGuard<'a>(&'a Cell<bool>);

impl<'a> SyncGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Registry of axis links between charts.
#[derive(Debug, Default)]
pub struct Syncer {
    links: Vec<AxisLink>,
    in_sync: Cell<bool>,
}

impl Syncer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn links(&self) -> &[AxisLink] {
        &self.links
    }

    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.in_sync.get()
    }

    /// Links `slave_axis` of `slave` to `master_axis` of `master`.
    ///
    /// Linking the same pair twice is a no-op.
    pub fn sync(
        &mut self,
        master: &SharedChart,
        master_axis: &str,
        slave: &SharedChart,
        slave_axis: &str,
    ) -> ChartResult<()> {
        master.borrow().axis(master_axis)?;
        slave.borrow().axis(slave_axis)?;
        if self
            .links
            .iter()
            .any(|link| link.matches(master, master_axis, slave, slave_axis))
        {
            return Ok(());
        }
        self.links.push(AxisLink {
            master: Rc::clone(master),
            master_axis: master_axis.to_owned(),
            slave: Rc::clone(slave),
            slave_axis: slave_axis.to_owned(),
        });
        debug!(master_axis, slave_axis, links = self.links.len(), "axes synced");
        Ok(())
    }

    /// Links the primary horizontal axes of two charts.
    pub fn sync_x(&mut self, master: &SharedChart, slave: &SharedChart) -> ChartResult<()> {
        let (master_axis, slave_axis) = primary_axes(master, slave, true)?;
        self.sync(master, &master_axis, slave, &slave_axis)
    }

    /// Links the primary vertical axes of two charts.
    pub fn sync_y(&mut self, master: &SharedChart, slave: &SharedChart) -> ChartResult<()> {
        let (master_axis, slave_axis) = primary_axes(master, slave, false)?;
        self.sync(master, &master_axis, slave, &slave_axis)
    }

    /// Removes a link; returns whether it existed.
    pub fn unsync(
        &mut self,
        master: &SharedChart,
        master_axis: &str,
        slave: &SharedChart,
        slave_axis: &str,
    ) -> bool {
        let before = self.links.len();
        self.links
            .retain(|link| !link.matches(master, master_axis, slave, slave_axis));
        before != self.links.len()
    }

    /// Zooms an axis of `chart` and carries the resulting domain to every
    /// axis reachable through links.
    ///
    /// Each (chart, axis) pair is zoomed at most once per call, so mutual
    /// links terminate with equal domains. A call made while a sync pass is
    /// running only zooms `chart` itself.
    pub fn zoom(
        &self,
        chart: &SharedChart,
        axis: &str,
        start: Option<f64>,
        end: Option<f64>,
    ) -> ChartResult<()> {
        chart.borrow_mut().zoom(Some(axis), start, end, true)?;

        let Some(_guard) = SyncGuard::acquire(&self.in_sync) else {
            trace!(axis, "sync already running");
            return Ok(());
        };

        let mut visited: HashSet<(*const RefCell<Chart>, String)> = HashSet::new();
        visited.insert((Rc::as_ptr(chart), axis.to_owned()));
        let mut queue: VecDeque<(SharedChart, String)> = VecDeque::new();
        queue.push_back((Rc::clone(chart), axis.to_owned()));

        while let Some((master, master_axis)) = queue.pop_front() {
            let (start, end) = master.borrow().axis(&master_axis)?.scale().domain();
            for link in &self.links {
                if !Rc::ptr_eq(&link.master, &master) || link.master_axis != master_axis {
                    continue;
                }
                if !visited.insert((Rc::as_ptr(&link.slave), link.slave_axis.clone())) {
                    trace!(slave_axis = %link.slave_axis, "slave already synced");
                    continue;
                }
                link.slave
                    .borrow_mut()
                    .zoom(Some(&link.slave_axis), Some(start), Some(end), true)?;
                queue.push_back((Rc::clone(&link.slave), link.slave_axis.clone()));
            }
        }
        debug!(axis, synced = visited.len() - 1, "sync pass finished");
        Ok(())
    }
}

fn primary_axes(
    master: &SharedChart,
    slave: &SharedChart,
    horizontal: bool,
) -> ChartResult<(String, String)> {
    let lookup = |chart: &SharedChart| -> ChartResult<String> {
        let chart = chart.borrow();
        let tag = if horizontal {
            chart.x_axis_tag()
        } else {
            chart.y_axis_tag()
        };
        tag.map(str::to_owned).ok_or_else(|| {
            ChartError::InvalidConfig(format!(
                "chart has no {} axis",
                if horizontal { "horizontal" } else { "vertical" }
            ))
        })
    };
    Ok((lookup(master)?, lookup(slave)?))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{SharedChart, Syncer};
    use crate::api::{Axis, Chart, ChartConfig, Graphic};
    use crate::core::Edge;

    fn shared_chart() -> SharedChart {
        let mut chart = Chart::new(ChartConfig::default()).expect("chart");
        chart
            .add(Graphic::new("x", Axis::linear(Edge::Bottom).expect("axis")))
            .expect("add");
        Rc::new(RefCell::new(chart))
    }

    #[test]
    fn guard_is_released_after_pass() {
        let (a, b) = (shared_chart(), shared_chart());
        let mut syncer = Syncer::new();
        syncer.sync_x(&a, &b).expect("sync");
        syncer.zoom(&a, "x", Some(1.0), Some(3.0)).expect("zoom");
        assert!(!syncer.is_syncing());
        assert_eq!(b.borrow().axis("x").expect("x").scale().domain(), (1.0, 3.0));
    }

    #[test]
    fn unsync_stops_propagation() {
        let (a, b) = (shared_chart(), shared_chart());
        let mut syncer = Syncer::new();
        syncer.sync(&a, "x", &b, "x").expect("sync");
        assert!(syncer.unsync(&a, "x", &b, "x"));
        syncer.zoom(&a, "x", Some(1.0), Some(3.0)).expect("zoom");
        assert_eq!(b.borrow().axis("x").expect("x").scale().domain(), (0.0, 1.0));
    }

    #[test]
    fn unknown_axis_cannot_be_linked() {
        let (a, b) = (shared_chart(), shared_chart());
        let mut syncer = Syncer::new();
        assert!(syncer.sync(&a, "missing", &b, "x").is_err());
        assert!(syncer.sync_y(&a, &b).is_err());
    }
}
