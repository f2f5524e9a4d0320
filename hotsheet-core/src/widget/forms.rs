//! Administrative forms: widget settings and the per-post date box.

use crate::dates::format_feature_date;
use crate::models::{Category, Post, WidgetConfig};

use super::Markup;

pub(crate) fn render_settings_form(config: &WidgetConfig, categories: &[Category]) -> Markup {
    let mut out = Markup::empty();

    out.push_raw(r#"<p><label for="hotsheet-title">Title:</label>"#);
    out.push_raw(r#"<input type="text" id="hotsheet-title" name="title" value=""#);
    out.push_text(&config.title);
    out.push_raw(r#""/></p>"#);

    out.push_raw(r#"<p><label for="hotsheet-category">Category:</label>"#);
    out.push_raw(r#"<select id="hotsheet-category" name="category_id">"#);
    push_option(&mut out, 0, "All", config.category_id <= 0);
    for category in categories {
        push_option(
            &mut out,
            category.id,
            &category.name,
            category.id == config.category_id,
        );
    }
    out.push_raw("</select></p>");

    out
}

fn push_option(out: &mut Markup, value: i64, label: &str, selected: bool) {
    out.push_raw(&format!(r#"<option value="{}""#, value));
    if selected {
        out.push_raw(r#" selected="selected""#);
    }
    out.push_raw(">");
    out.push_text(label);
    out.push_raw("</option>");
}

/// The "Feature this post until" box shown while editing a post.
pub fn render_feature_date_box(post: &Post) -> Markup {
    let value = post.feature_until.map(format_feature_date).unwrap_or_default();
    let mut out = Markup::empty();

    out.push_raw(r#"<div class="hotsheet-box"><label for="hotsheet-date">"#);
    out.push_text("Feature this post until");
    out.push_raw(r#"</label><br><br><input type="text" id="hotsheet-date" name="date" value=""#);
    out.push_text(&value);
    out.push_raw(r#"" size="10" maxlength="10"/><br><br>"#);
    out.push_text(
        "Enter date in the form m/d/yyyy.  Leave empty to leave this post off the Hot Sheet.",
    );
    out.push_raw("</div>");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: 1,
                name: "Events".to_string(),
            },
            Category {
                id: 2,
                name: "Bits & Bobs".to_string(),
            },
        ]
    }

    #[test]
    fn settings_form_selects_all_by_default() {
        let html = render_settings_form(&WidgetConfig::default(), &categories());

        assert!(html
            .as_str()
            .contains(r#"<option value="0" selected="selected">All</option>"#));
        assert!(html.as_str().contains(r#"<option value="1">Events</option>"#));
        assert!(html.as_str().contains("Bits &amp; Bobs"));
    }

    #[test]
    fn settings_form_marks_the_configured_category() {
        let config = WidgetConfig {
            title: r#"Say "hi""#.to_string(),
            category_id: 2,
        };
        let html = render_settings_form(&config, &categories());

        assert!(html.as_str().contains(r#"<option value="0">All</option>"#));
        assert!(html
            .as_str()
            .contains(r#"<option value="2" selected="selected">"#));
        assert!(html.as_str().contains(r#"value="Say &quot;hi&quot;""#));
    }

    #[test]
    fn date_box_shows_stored_date() {
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap();
        let mut post = Post {
            id: Uuid::new_v4(),
            title: "Fair".to_string(),
            url: "/fair".to_string(),
            categories: vec![],
            feature_until: Some(at),
            created_at: at,
            updated_at: at,
        };

        assert!(render_feature_date_box(&post)
            .as_str()
            .contains(r#"value="03/04/2024""#));

        post.feature_until = None;
        assert!(render_feature_date_box(&post).as_str().contains(r#"value="""#));
    }
}
