//! Index-based model assembly.
//!
//! [`ModelArena`] holds lens records in a `Vec` and lets composites refer to
//! their members by [`LensId`]. This is the assembly surface for callers that
//! wire models together by handle (bindings, model editors) rather than by
//! value. Because membership is by index, a composite could be made to
//! contain itself; [`ModelArena::add_member`] walks the member's subtree and
//! rejects such edges with [`LensError::CyclicComposition`], so the graph
//! stays a tree and [`ModelArena::build`] always terminates.
//!
//! # Example
//!
//! ```
//! use lensing::arena::ModelArena;
//! use lensing::distance::LensDistance;
//! use lensing::error::LensError;
//! use lensing::profiles::SisLens;
//! use lensing::vector::AngularVector;
//! use units::{Angle, Velocity};
//!
//! let d_d = LensDistance::from_mpc(1000.0).unwrap();
//! let mut arena = ModelArena::new();
//!
//! let sis = arena.insert(SisLens::new(d_d, Velocity::from_km_per_sec(200.0)).unwrap()).unwrap();
//! let outer = arena.insert_composite(d_d).unwrap();
//! let inner = arena.insert_composite(d_d).unwrap();
//!
//! arena.add_member(inner, 1.0, AngularVector::zeros(), Angle::zero(), sis).unwrap();
//! arena.add_member(outer, 1.0, AngularVector::zeros(), Angle::zero(), inner).unwrap();
//!
//! // inner -> outer would close a loop
//! let err = arena.add_member(inner, 1.0, AngularVector::zeros(), Angle::zero(), outer);
//! assert!(matches!(err, Err(LensError::CyclicComposition { .. })));
//!
//! let model = arena.build(outer).unwrap();
//! ```

use std::sync::Arc;

use tracing::{debug, warn};
use units::Angle;

use crate::composite::{CompositeLens, CompositeMember};
use crate::distance::LensDistance;
use crate::error::{LensError, Result};
use crate::lens::Lens;
use crate::params::LensParams;
use crate::vector::AngularVector;

/// Handle to a record in a [`ModelArena`].
///
/// Uses `u32` like the other index types in this workspace; inserting past
/// `u32::MAX` records fails instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LensId(u32);

impl LensId {
    pub(crate) fn from_index(index: usize) -> Result<Self> {
        u32::try_from(index).map(LensId).map_err(|_| {
            LensError::invalid("lens_id", format!("arena index {index} does not fit a u32 handle"))
        })
    }

    fn index(self) -> usize {
        self.0 as usize
    }

    /// The raw index, stable for the lifetime of the arena
    pub fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone)]
struct MemberRef {
    weight: f64,
    offset: AngularVector,
    rotation: Angle,
    lens: LensId,
}

#[derive(Debug, Clone)]
enum Record {
    /// A complete, immutable lens (elementary or an already built composite)
    Finished(Arc<Lens>),
    /// A composite still accepting members
    Draft {
        distance: LensDistance,
        members: Vec<MemberRef>,
    },
}

/// Arena of lens records with index-based composite membership.
#[derive(Debug, Clone, Default)]
pub struct ModelArena {
    records: Vec<Record>,
}

impl ModelArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stores a finished lens.
    pub fn insert(&mut self, lens: impl Into<Lens>) -> Result<LensId> {
        self.insert_shared(Arc::new(lens.into()))
    }

    /// Stores a finished lens that is also held elsewhere.
    pub fn insert_shared(&mut self, lens: Arc<Lens>) -> Result<LensId> {
        self.push(Record::Finished(lens))
    }

    /// Initializes a lens from parameters and stores it.
    pub fn insert_params(&mut self, params: &LensParams) -> Result<LensId> {
        let lens = Lens::from_params(params)?;
        self.insert(lens)
    }

    /// Opens an empty composite that members can be added to.
    pub fn insert_composite(&mut self, distance: LensDistance) -> Result<LensId> {
        self.push(Record::Draft {
            distance,
            members: Vec::new(),
        })
    }

    fn push(&mut self, record: Record) -> Result<LensId> {
        let id = LensId::from_index(self.records.len())?;
        self.records.push(record);
        Ok(id)
    }

    fn record(&self, id: LensId) -> Result<&Record> {
        self.records.get(id.index()).ok_or_else(|| {
            LensError::invalid("lens_id", format!("no lens #{} in this arena", id.raw()))
        })
    }

    /// Appends `member` to the open composite `composite`.
    ///
    /// Fails with `CyclicComposition` when `composite` is reachable from
    /// `member` (including `member == composite`); the arena is unchanged on
    /// any error.
    pub fn add_member(
        &mut self,
        composite: LensId,
        weight: f64,
        offset: AngularVector,
        rotation: Angle,
        member: LensId,
    ) -> Result<()> {
        self.record(member)?;
        match self.record(composite)? {
            Record::Draft { .. } => {}
            Record::Finished(_) => {
                return Err(LensError::invalid(
                    "composite",
                    format!("lens #{} is not an open composite", composite.raw()),
                ))
            }
        }
        if !weight.is_finite() {
            return Err(LensError::invalid("weight", format!("must be finite, got {weight}")));
        }
        if !(offset.x.is_finite() && offset.y.is_finite() && rotation.to_radians().is_finite()) {
            return Err(LensError::invalid("placement", "offset and rotation must be finite"));
        }
        if self.reaches(member, composite) {
            warn!(composite = composite.raw(), member = member.raw(), "rejected cyclic membership");
            return Err(LensError::CyclicComposition {
                composite: composite.raw(),
                member: member.raw(),
            });
        }

        if let Some(Record::Draft { members, .. }) = self.records.get_mut(composite.index()) {
            members.push(MemberRef {
                weight,
                offset,
                rotation,
                lens: member,
            });
        }
        Ok(())
    }

    /// True when `target` is `from` or lies in its membership subtree.
    fn reaches(&self, from: LensId, target: LensId) -> bool {
        let mut visited = vec![false; self.records.len()];
        let mut stack = vec![from];

        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if std::mem::replace(&mut visited[id.index()], true) {
                continue;
            }
            if let Record::Draft { members, .. } = &self.records[id.index()] {
                stack.extend(members.iter().map(|m| m.lens));
            }
        }
        false
    }

    /// Freezes the tree rooted at `id` into an immutable lens.
    ///
    /// Subtrees referenced more than once are built once and shared. The
    /// arena itself is left untouched, so drafts can keep growing and be
    /// built again.
    pub fn build(&self, id: LensId) -> Result<Arc<Lens>> {
        self.record(id)?;
        let mut built: Vec<Option<Arc<Lens>>> = vec![None; self.records.len()];
        let lens = self.build_into(id, &mut built)?;
        debug!(root = id.raw(), "built model from arena");
        Ok(lens)
    }

    fn build_into(&self, id: LensId, built: &mut [Option<Arc<Lens>>]) -> Result<Arc<Lens>> {
        if let Some(lens) = &built[id.index()] {
            return Ok(Arc::clone(lens));
        }
        let lens = match &self.records[id.index()] {
            Record::Finished(lens) => Arc::clone(lens),
            Record::Draft { distance, members } => {
                let members = members
                    .iter()
                    .map(|m| -> Result<CompositeMember> {
                        let lens = self.build_into(m.lens, built)?;
                        Ok(CompositeMember::new(m.weight, m.offset, m.rotation, lens))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Arc::new(Lens::Composite(CompositeLens::new(*distance, members)?))
            }
        };
        built[id.index()] = Some(Arc::clone(&lens));
        Ok(lens)
    }
}
