use super::{category_gradient, escape_html, RenderOptions};
use crate::models::{load_state::LOADING_CAPTION, BookAction, RecommendationItem};

pub const OUT_OF_STOCK_LABEL: &str = "Out of Stock";

pub fn render_loading() -> String {
    format!(
        r#"<div class="recommendations-loading">
    <div class="loading-spinner" style="margin: 20px auto;"></div>
    <p>{}</p>
</div>"#,
        LOADING_CAPTION
    )
}

/// Fallback block shared by the empty and error states
pub fn render_notice(icon: &str, message: &str) -> String {
    format!(
        r#"<div class="recommendations-empty">
    <div class="empty-icon">{}</div>
    <p>{}</p>
</div>"#,
        icon,
        escape_html(message)
    )
}

pub fn render_card(item: &RecommendationItem, index: usize, options: &RenderOptions) -> String {
    let delay_ms = index as u64 * options.stagger_ms;
    let overlay: String = item.category.chars().take(3).collect::<String>().to_uppercase();

    format!(
        r#"<div class="book-card recommendation-card" style="animation-delay: {delay}ms">
    <div class="book-cover" style="background: {gradient};">
        <div class="cover-overlay">{overlay}</div>
    </div>
    <div class="book-info">
        <h3 class="book-title">{title}</h3>
        <p class="book-author">{author}</p>
        <div class="book-meta">
            <span class="category">{category}</span>
            <span class="availability {availability}">{available}/{total} available</span>
        </div>
        <div class="book-actions">
            {issue}
            {reserve}
        </div>
    </div>
</div>"#,
        delay = delay_ms,
        gradient = category_gradient(&item.category),
        overlay = escape_html(&overlay),
        title = escape_html(&item.title),
        author = escape_html(&item.author),
        category = escape_html(&item.category),
        availability = item.availability().css_class(),
        available = item.available_copies,
        total = item.total_copies,
        issue = issue_control(item),
        reserve = action_button("btn-small btn-ghost", BookAction::Reserve, &item.isbn, "Reserve"),
    )
}

fn issue_control(item: &RecommendationItem) -> String {
    if item.in_stock() {
        action_button("btn-small btn-outline", BookAction::Issue, &item.isbn, "Issue")
    } else {
        format!(
            r#"<button class="btn-small btn-outline disabled" disabled>{}</button>"#,
            OUT_OF_STOCK_LABEL
        )
    }
}

fn action_button(class: &str, action: BookAction, isbn: &str, label: &str) -> String {
    format!(
        r#"<button class="{}" data-action="{}" data-isbn="{}">{}</button>"#,
        class,
        action,
        escape_html(isbn),
        label
    )
}
