use inspection_structs::Position;

pub type Vector = [f64; 3];

pub fn distance(p0: &Position, p1: &Position) -> f64 {
    p0.dist(p1)
}

/// Point `index * spacing` along the segment. A zero-length segment puts every
/// waypoint on `start`.
pub fn waypoint_position(start: &Position, end: &Position, spacing: f64, index: usize, distance: f64) -> Position {
    let ratio = if distance > 0.0 { index as f64 * spacing / distance } else { 0.0 };
    Position {
        x: start.x + (end.x - start.x) * ratio,
        y: start.y + (end.y - start.y) * ratio,
        z: start.z + (end.z - start.z) * ratio,
    }
}

pub fn normalized_direction(start: &Position, end: &Position) -> Vector {
    let length = distance(start, end);
    if length > 0.0 {
        [(end.x - start.x) / length, (end.y - start.y) / length, (end.z - start.z) / length]
    } else {
        [0.0; 3]
    }
}

pub fn offset(position: &Position, direction: Vector, distance: f64) -> Position {
    Position {
        x: position.x + direction[0] * distance,
        y: position.y + direction[1] * distance,
        z: position.z + direction[2] * distance,
    }
}
