use plotters::prelude::*;

use stroke_insert::{
    BezierPoint, CurveData, InputEvent, InsertConfig, InsertSession, Point, Point3, Projection,
    Response, SplineData, ViewState,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let p = |x: f64, y: f64| Point3::new([x, y, 0.0]);
    let curve = CurveData::new(vec![SplineData::new(vec![
        BezierPoint::new(p(0.0, 1.77), p(-1.0, 2.5), p(1.1, -1.0)),
        BezierPoint::new(p(3.2, -4.0), p(4.3, 3.0), p(3.5, -5.0)),
    ])]);

    // camera looking down -z onto the xy plane
    let view = ViewState::orthographic(
        Point3::new([2.0, -1.0, 10.0]),
        Point3::new([2.0, -1.0, 0.0]),
        Point3::new([0.0, 1.0, 0.0]),
        5.0,
        640.0,
        480.0,
        0.1,
        100.0,
    );

    let original = curve.splines[0].to_spline();
    let target = original.eval(0.3).ok_or("curve has no segments")?;
    let cursor = view.project(target).ok_or("target is out of view")?;

    let config = InsertConfig::default();
    let mut session = InsertSession::begin(curve, &config, view, cursor)?;
    // wiggle the cursor a bit before confirming
    for offset in [-12.0, 7.5, 0.0] {
        let moved = stroke_insert::Point2::new([cursor.x() + offset, cursor.y()]);
        session.handle(InputEvent::PointerMove(moved))?;
    }
    let insertion = match session.handle(InputEvent::Confirm)? {
        Response::Committed(insertion) => insertion,
        other => return Err(format!("insertion was not committed: {:?}", other).into()),
    };

    // render the paths of the curve to desired accuracy
    let nsteps: usize = 1000;
    let mut curve_graph: Vec<(f64, f64)> = Vec::with_capacity(nsteps + 1);
    for t in 0..=nsteps {
        if let Some(p) = original.eval(t as f64 / nsteps as f64) {
            curve_graph.push((p.axis(0), p.axis(1)));
        }
    }

    let points = &insertion.curve.splines[0].points;
    let anchors: Vec<(f64, f64)> = points.iter().map(|b| (b.co.x(), b.co.y())).collect();
    let handles: Vec<Vec<(f64, f64)>> = points
        .iter()
        .map(|b| {
            vec![
                (b.handle_left.x(), b.handle_left.y()),
                (b.co.x(), b.co.y()),
                (b.handle_right.x(), b.handle_right.y()),
            ]
        })
        .collect();

    let root = BitMapBackend::new("insert_point.png", (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Point inserted at t = {:.3}", insertion.result.t),
            ("sans-serif", 21).into_font(),
        )
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(-2.0..6.0, -6.0..4.0)?;

    chart.configure_mesh().draw()?;

    chart
        .draw_series(LineSeries::new(curve_graph, &RED))?
        .label("B(t)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .draw_series(handles.into_iter().map(|line| PathElement::new(line, BLUE.mix(0.6))))?
        .label("handles")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart.draw_series(PointSeries::of_element(
        anchors,
        5,
        &BLUE,
        &|coord, size, style| {
            EmptyElement::at(coord)
                + Circle::new((0, 0), size, style)
                + Text::new(
                    format!("({:.2}, {:.2})", coord.0, coord.1),
                    (0, 15),
                    ("sans-serif", 15).into_font(),
                )
        },
    ))?;

    let new_point = insertion.split.anchor();
    chart
        .draw_series(std::iter::once(Circle::new(
            (new_point.x(), new_point.y()),
            7,
            GREEN.filled(),
        )))?
        .label("inserted anchor")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, GREEN.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}
