use num_traits::Float;

/// `20 * log10(gain)`, never below `floor_db`. Non-positive gains map to the floor.
pub fn gain_to_decibels<T: Float + From<f32>>(gain: T, floor_db: T) -> T {
    if gain > T::zero() {
        let db = <T as From<f32>>::from(20.0) * gain.log10();
        db.max(floor_db)
    } else {
        floor_db
    }
}
