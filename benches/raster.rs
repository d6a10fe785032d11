use criterion::{black_box, criterion_group, criterion_main, Criterion};
use inscribble::basics::{PointF, RectF};
use inscribble::image::{Image, ImageSettings};
use inscribble::pixel_buffer::PixelBuffer;
use inscribble::raster::RunRaster;
use inscribble::stroke::CursorState;

/// Raster with every row fragmented into short dashes, so run arrays are
/// long and the splice path has to walk and merge real segments.
fn dashed_raster(width: u32, height: u32) -> RunRaster {
    let mut raster = RunRaster::new(width, height);
    for y in 0..height as i32 {
        let phase = (y % 13) * 3;
        let mut x = phase;
        while x < width as i32 {
            raster.line(x, x + 7, y, true);
            x += 19;
        }
    }
    raster
}

fn bench_line(c: &mut Criterion) {
    c.bench_function("line_fragment_2k", |b| {
        b.iter(|| {
            let raster = dashed_raster(2_000, 64);
            black_box(raster.row(0).len())
        })
    });

    // Repainting over an already fragmented row exercises the merge side
    // of the splice: runs collapse instead of multiplying.
    let mut raster = dashed_raster(2_000, 64);
    c.bench_function("line_repaint_2k", |b| {
        b.iter(|| {
            for y in 0..64 {
                raster.line(0, 2_000, y, true);
                raster.line(0, 2_000, y, false);
            }
            let phase = 5;
            for y in 0..64 {
                let mut x = phase;
                while x < 2_000 {
                    raster.line(x, x + 7, y, true);
                    x += 19;
                }
            }
            black_box(raster.row(5).len())
        })
    });
}

fn bench_combine(c: &mut Criterion) {
    let raster = dashed_raster(4_000, 400);
    let mut counts = vec![0u32; 400];

    c.bench_function("combine_10x_row", |b| {
        b.iter(|| {
            for display_y in 0..40 {
                counts.fill(0);
                raster.combine(black_box(&mut counts), 0, display_y, 10);
            }
            black_box(counts[0])
        })
    });
}

fn bench_mark(c: &mut Criterion) {
    let settings = ImageSettings {
        canvas_width: 4_000,
        canvas_height: 4_000,
        ..ImageSettings::default()
    };
    let start = CursorState::new(PointF::new(20.0, 20.0), 9.0);
    let end = CursorState::new(PointF::new(380.0, 360.0), 4.0);

    c.bench_function("mark_diagonal_stroke", |b| {
        b.iter(|| {
            let mut image = Image::new(settings.clone());
            let region = image.mark(black_box(&start), black_box(&end), true);
            black_box(region)
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let settings = ImageSettings {
        canvas_width: 4_000,
        canvas_height: 4_000,
        ..ImageSettings::default()
    };
    let mut image = Image::new(settings);
    let start = CursorState::new(PointF::new(20.0, 20.0), 9.0);
    let end = CursorState::new(PointF::new(380.0, 360.0), 4.0);
    image.mark(&start, &end, true);
    image.finish_mark();

    let viewport = RectF::new(0.0, 0.0, 400.0, 400.0);
    let mut target = PixelBuffer::new(400, 400);

    c.bench_function("render_400px_viewport", |b| {
        b.iter(|| {
            let rendered = image.render(black_box(&viewport), &mut target);
            black_box(rendered)
        })
    });
}

criterion_group!(benches, bench_line, bench_combine, bench_mark, bench_render);
criterion_main!(benches);
