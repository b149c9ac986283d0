use criterion::{criterion_group, criterion_main, Criterion};
use geo::geometry::Coord;
use image::{DynamicImage, Rgba, RgbaImage};
use ndom::{BBox, HeightGrid, Palette};
use obstruction::ObstructionResult;

const SITE: Coord = Coord {
    x: 6.083887,
    y: 50.775346,
};

fn obstruction_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("Obstruction Scan");

    let bbox = BBox::around(SITE, 0.001, 0.001);
    // Open ground everywhere: the scan walks the cone out to the
    // full radius ceiling, its worst case.
    let image = RgbaImage::from_pixel(400, 300, Rgba([255, 255, 255, 255]));
    let grid = HeightGrid::decode(&DynamicImage::ImageRgba8(image), bbox, &Palette::ndom())
        .smoothed();

    group.bench_with_input("exhaustive", &grid, |b, grid| {
        b.iter(|| {
            ObstructionResult::builder()
                .origin(SITE)
                .bearing(45.0)
                .eval_height(6.0)
                .scan(grid)
                .unwrap()
        })
    });
}

criterion_group!(benches, obstruction_scan);
criterion_main!(benches);
