use super::RoadMask;
use crate::grid::Grid;
use tracing::info;

impl RoadMask {
    /// Widen painted roads by `radius` with the flat-window dilation, then
    /// drop every cell outside `roadable`.
    ///
    /// The clamp applies at radius 0 as well, so painted cells on impassable
    /// terrain never survive into the final grid.
    pub fn thicken(&self, radius: usize, roadable: &Grid<bool>) -> Grid<bool> {
        let widened = self.grid().dilate(radius);
        let clamped = widened.and(roadable);
        info!(
            "Thickened roads by {radius}: {} painted, {} widened, {} kept",
            self.count(),
            widened.count_true(),
            clamped.count_true()
        );
        clamped
    }
}
