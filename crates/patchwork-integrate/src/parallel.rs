//! Fork-join accumulation over disjoint surface partitions.

use patchwork_math::KahanAdder;
use patchwork_patch::PatchKind;
use patchwork_surface::{SurfaceCursor, SurfaceIterator, SurfaceIteratorSplitter};
use rayon::prelude::*;

use crate::error::Result;

/// Drain `iter` into `width` compensated sums.
pub(crate) fn accumulate<I, F>(iter: &mut I, width: usize, mut per_patch: F) -> Result<Vec<KahanAdder>>
where
    I: SurfaceIterator + ?Sized,
    F: FnMut(&[f64], PatchKind, &mut [KahanAdder]) -> Result<()>,
{
    let mut adders = vec![KahanAdder::new(); width];
    let mut buf = [0.0; 48];
    while !iter.is_done() {
        let kind = iter.current_segment(&mut buf)?;
        per_patch(&buf[..kind.coord_len()], kind, &mut adders)?;
        iter.next()?;
    }
    Ok(adders)
}

/// Split `base` into `partitions` ranges, accumulate each on the rayon
/// pool with its own adders, then add the partial sums in partition order.
pub(crate) fn sum_partitions<F>(base: impl SurfaceIterator, partitions: usize, width: usize, work: F) -> Result<Vec<f64>>
where
    F: Fn(&mut SurfaceCursor<'_>) -> Result<Vec<KahanAdder>> + Sync,
{
    let splitter = SurfaceIteratorSplitter::new(partitions, base)?;
    let partials: Vec<Result<Vec<KahanAdder>>> = splitter
        .partitions()
        .into_par_iter()
        .enumerate()
        .map(|(index, mut cursor)| {
            let adders = work(&mut cursor)?;
            tracing::trace!(
                partition = index,
                sums = ?adders.iter().map(KahanAdder::sum).collect::<Vec<_>>(),
                "partition finished"
            );
            Ok(adders)
        })
        .collect();

    let mut totals = vec![KahanAdder::new(); width];
    for partial in partials {
        for (total, adder) in totals.iter_mut().zip(partial?) {
            total.add(adder.sum());
        }
    }
    Ok(totals.iter().map(KahanAdder::sum).collect())
}
