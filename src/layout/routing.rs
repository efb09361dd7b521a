use super::NodeBox;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo((f32, f32)),
    LineTo((f32, f32)),
    CubicTo((f32, f32), (f32, f32), (f32, f32)),
}

/// Control points of the S-curve from the bottom center of `source` to the
/// top center of `target`. The inner points sit at vertical thirds, the first
/// above the start and the second above the end.
pub fn connector_points(source: &NodeBox, target: &NodeBox) -> [(f32, f32); 4] {
    let start = (source.center_x(), source.bottom());
    let end = (target.center_x(), target.y);
    let dy = end.1 - start.1;
    [
        start,
        (start.0, start.1 + dy / 3.0),
        (end.0, start.1 + 2.0 * dy / 3.0),
        end,
    ]
}

/// Uniform cubic B-spline through `points`, clamped to both endpoints.
///
/// Matches d3's `curveBasis`: the curve starts and ends exactly on the first
/// and last point and is pulled toward, but does not pass through, the inner
/// ones.
pub fn basis_commands(points: &[(f32, f32)]) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    let Some(&first) = points.first() else {
        return commands;
    };
    commands.push(PathCommand::MoveTo(first));
    match points.len() {
        1 => return commands,
        2 => {
            commands.push(PathCommand::LineTo(points[1]));
            return commands;
        }
        _ => {}
    }

    let (p0, p1) = (points[0], points[1]);
    commands.push(PathCommand::LineTo((
        (5.0 * p0.0 + p1.0) / 6.0,
        (5.0 * p0.1 + p1.1) / 6.0,
    )));
    for window in points.windows(3) {
        commands.push(basis_segment(window[0], window[1], window[2]));
    }
    let last = points[points.len() - 1];
    let before = points[points.len() - 2];
    commands.push(basis_segment(before, last, last));
    commands.push(PathCommand::LineTo(last));
    commands
}

fn basis_segment(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> PathCommand {
    PathCommand::CubicTo(
        ((2.0 * a.0 + b.0) / 3.0, (2.0 * a.1 + b.1) / 3.0),
        ((a.0 + 2.0 * b.0) / 3.0, (a.1 + 2.0 * b.1) / 3.0),
        ((a.0 + 4.0 * b.0 + c.0) / 6.0, (a.1 + 4.0 * b.1 + c.1) / 6.0),
    )
}
