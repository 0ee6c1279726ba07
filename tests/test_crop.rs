mod test_utils;

use overlay_placement::{
    Corner, CropError, GeoPoint, GeoRect, PlaneProjection, Vector2, crop_lasso, crop_rectangular,
};
use test_utils::{equator_model, pixel_at, position_coded_asset, test_projection};

/// Geographic point at the given fractions of the model's planar rectangle
/// (x fraction west-to-east, y fraction north-to-south).
fn geo_at_fraction(
    proj: &dyn PlaneProjection,
    model: &overlay_placement::TransformModel,
    fx: f64,
    fy: f64,
) -> GeoPoint {
    let top_left = proj.to_plane(model.bounds.corner(Corner::NorthWest));
    let bottom_right = proj.to_plane(model.bounds.corner(Corner::SouthEast));
    proj.to_geo(Vector2::new(
        top_left.x + fx * (bottom_right.x - top_left.x),
        top_left.y + fy * (bottom_right.y - top_left.y),
    ))
}

#[test]
fn rect_crop_of_full_bounds_is_identity_sized() {
    let proj = test_projection();
    let model = equator_model(0.002, 0.001);
    let asset = position_coded_asset(64, 48);

    let (cropped, new_model) = crop_rectangular(&asset, &model, model.bounds, &proj).unwrap();

    assert_eq!(cropped.width_px(), 64);
    assert_eq!(cropped.height_px(), 48);
    assert_eq!(new_model.rotation_deg, 0.0);
    assert!(new_model.pivot.is_none());
    assert!(new_model.bounds.fuzzy_eq(model.bounds));
    // content unshifted
    assert_eq!(pixel_at(&cropped, 0, 0), [0, 0, 0, 255]);
    assert_eq!(pixel_at(&cropped, 63, 47), [63, 47, 63 ^ 47, 255]);
}

#[test]
fn rect_crop_selects_the_right_source_pixels() {
    let proj = test_projection();
    let model = equator_model(0.002, 0.001);
    let asset = position_coded_asset(100, 80);

    // crop the x: [0.25, 0.75], y: [0.25, 0.5] fractional region
    let crop_bounds = GeoRect::from_points(
        geo_at_fraction(&proj, &model, 0.25, 0.25),
        geo_at_fraction(&proj, &model, 0.75, 0.5),
    );

    let (cropped, new_model) = crop_rectangular(&asset, &model, crop_bounds, &proj).unwrap();

    assert_eq!(cropped.width_px(), 50);
    assert_eq!(cropped.height_px(), 20);
    assert_eq!(pixel_at(&cropped, 0, 0), [25, 20, 25 ^ 20, 255]);
    assert_eq!(new_model.rotation_deg, 0.0);
    assert!(new_model.bounds.fuzzy_eq(crop_bounds));
}

#[test]
fn rect_crop_clamps_partial_overlap_to_source() {
    let proj = test_projection();
    let model = equator_model(0.002, 0.001);
    let asset = position_coded_asset(100, 80);

    // overlaps only the left half horizontally, full height plus overshoot
    let crop_bounds = GeoRect::from_points(
        geo_at_fraction(&proj, &model, -0.5, -0.25),
        geo_at_fraction(&proj, &model, 0.5, 1.25),
    );

    let (cropped, new_model) = crop_rectangular(&asset, &model, crop_bounds, &proj).unwrap();
    assert_eq!(cropped.width_px(), 50);
    assert_eq!(cropped.height_px(), 80);
    assert_eq!(pixel_at(&cropped, 0, 0), [0, 0, 0, 255]);

    // the placement covers only the region the cut pixels came from, not the
    // requested rect's overhang
    let clamped = GeoRect::from_points(
        geo_at_fraction(&proj, &model, 0.0, 0.0),
        geo_at_fraction(&proj, &model, 0.5, 1.0),
    );
    assert!(new_model.bounds.fuzzy_eq(clamped));
    assert_eq!(new_model.rotation_deg, 0.0);
}

#[test]
fn rect_crop_entirely_outside_is_rejected() {
    let proj = test_projection();
    let model = equator_model(0.002, 0.001);
    let asset = position_coded_asset(64, 48);

    let crop_bounds = GeoRect::from_points(
        geo_at_fraction(&proj, &model, 2.0, 2.0),
        geo_at_fraction(&proj, &model, 3.0, 3.0),
    );

    assert_eq!(
        crop_rectangular(&asset, &model, crop_bounds, &proj),
        Err(CropError::InvalidCropRegion)
    );
}

#[test]
fn rect_crop_on_rotated_asset_unrotates_into_source_space() {
    let proj = test_projection();
    let mut model = equator_model(0.002, 0.001);
    model.rotation_deg = 90.0;
    let asset = position_coded_asset(100, 80);

    // the crop UI tracks the asset's visual (rotated) diagonal corners
    let center = proj.to_plane(model.bounds.center());
    let visual = |c: Corner| {
        proj.to_geo(
            proj.to_plane(model.bounds.corner(c))
                .rotate_about_deg(center, 90.0),
        )
    };
    let crop_bounds = GeoRect::from_points(visual(Corner::NorthWest), visual(Corner::SouthEast));

    let (cropped, new_model) = crop_rectangular(&asset, &model, crop_bounds, &proj).unwrap();

    // full asset recovered, placement re-leveled
    assert_eq!(cropped.width_px(), 100);
    assert_eq!(cropped.height_px(), 80);
    assert_eq!(new_model.rotation_deg, 0.0);
}

#[test]
fn lasso_crop_bounds_equal_lasso_bounding_box() {
    let proj = test_projection();
    let model = equator_model(0.002, 0.001);
    let asset = position_coded_asset(100, 80);

    let lasso = [
        geo_at_fraction(&proj, &model, 0.25, 0.25),
        geo_at_fraction(&proj, &model, 0.75, 0.25),
        geo_at_fraction(&proj, &model, 0.75, 0.75),
        geo_at_fraction(&proj, &model, 0.25, 0.75),
    ];

    let (cropped, new_model) = crop_lasso(&asset, &model, &lasso, &proj).unwrap();

    assert!(new_model.bounds.fuzzy_eq(GeoRect::bounding(&lasso).unwrap()));
    assert_eq!(new_model.rotation_deg, 0.0);
    assert_eq!(cropped.width_px(), 50);
    assert_eq!(cropped.height_px(), 40);
    // square lasso fills its own bounding box, so pixels are copied not cleared
    assert_eq!(pixel_at(&cropped, 0, 0), [25, 20, 25 ^ 20, 255]);
    assert_eq!(pixel_at(&cropped, 49, 39), [74, 59, 74 ^ 59, 255]);
}

#[test]
fn lasso_crop_clears_pixels_outside_the_polygon() {
    let proj = test_projection();
    let model = equator_model(0.002, 0.001);
    let asset = position_coded_asset(100, 100);

    // triangle: bbox corners away from the hypotenuse stay transparent
    let lasso = [
        geo_at_fraction(&proj, &model, 0.1, 0.1),
        geo_at_fraction(&proj, &model, 0.9, 0.1),
        geo_at_fraction(&proj, &model, 0.1, 0.9),
    ];

    let (cropped, _) = crop_lasso(&asset, &model, &lasso, &proj).unwrap();
    assert_eq!(cropped.width_px(), 80);
    assert_eq!(cropped.height_px(), 80);

    // near the right angle: inside
    assert_eq!(pixel_at(&cropped, 1, 1), [11, 11, 11 ^ 11, 255]);
    // far corner of the bbox, beyond the hypotenuse: cleared
    assert_eq!(pixel_at(&cropped, 79, 79), [0, 0, 0, 0]);
}

#[test]
fn lasso_crop_rejects_degenerate_input() {
    let proj = test_projection();
    let model = equator_model(0.002, 0.001);
    let asset = position_coded_asset(64, 48);

    let two_points = [
        geo_at_fraction(&proj, &model, 0.2, 0.2),
        geo_at_fraction(&proj, &model, 0.8, 0.8),
    ];
    assert_eq!(
        crop_lasso(&asset, &model, &two_points, &proj),
        Err(CropError::InvalidCropRegion)
    );

    let outside = [
        geo_at_fraction(&proj, &model, 2.0, 2.0),
        geo_at_fraction(&proj, &model, 3.0, 2.0),
        geo_at_fraction(&proj, &model, 2.5, 3.0),
    ];
    assert_eq!(
        crop_lasso(&asset, &model, &outside, &proj),
        Err(CropError::InvalidCropRegion)
    );
}
