use page_controller::{AnalyticsKind, Page};

const NAV_PAGE_HTML: &str = r##"<!DOCTYPE html>
<html lang="de">
<body>
    <nav class="navbar" id="navbar">
        <a href="#" id="logo-link">Blitz Umzüge</a>
        <div class="hamburger" id="hamburger"></div>
        <ul class="nav-menu" id="nav-menu">
            <li><a href="#home" class="nav-link">Start</a></li>
            <li><a href="#services" class="nav-link">Leistungen</a></li>
            <li><a href="#fleet" class="nav-link">Fuhrpark</a></li>
            <li><a href="#contact" class="nav-link">Kontakt</a></li>
        </ul>
    </nav>
    <section id="home">
        <h1>Stressfrei umziehen in Berlin</h1>
        <a href="#angebote" id="dead-anchor">Zu den Angeboten</a>
    </section>
    <section id="services">
        <div class="service-card" id="card-privat">Privatumzug</div>
        <div class="service-card" id="card-firma">Firmenumzug</div>
        <div class="service-card" id="card-fern">Fernumzug</div>
    </section>
    <section id="fleet">
        <div class="fleet-card" id="fleet-transporter">Transporter</div>
        <div class="fleet-card" id="fleet-lkw">7,5t LKW</div>
        <div class="feature-item" id="feature-versichert">Voll versichert</div>
        <div class="feature-item" id="feature-puenktlich">Pünktlich</div>
    </section>
    <section id="contact">
        <div class="contact-item" id="adresse-item"><a href="tel:+4930555123">030 555123</a></div>
        <div class="contact-item" id="zeiten-item">Mo-Fr 8-18 Uhr</div>
        <a href="https://www.facebook.com/blitzumzuege" class="social-icon" id="facebook-icon">f</a>
        <div class="contact-form-container" id="form-container">
            <form id="contactForm">
                <div class="form-group"><input type="text" id="name" name="name"></div>
                <div class="form-group"><input type="tel" id="phone" name="phone"></div>
                <button type="submit">Jetzt anfragen</button>
            </form>
        </div>
    </section>
</body>
</html>"##;

fn page_with_section_metrics() -> page_controller::Result<Page> {
    let mut page = Page::from_html(NAV_PAGE_HTML)?;
    page.set_metrics("#home", 0, 600)?;
    page.set_metrics("#services", 600, 700)?;
    page.set_metrics("#fleet", 1300, 500)?;
    page.set_metrics("#contact", 1800, 900)?;
    Ok(page)
}

#[test]
fn mobile_menu_journey_closes_and_scrolls() -> page_controller::Result<()> {
    let mut page = page_with_section_metrics()?;

    page.click("#hamburger")?;
    page.assert_class("#hamburger", "active", true)?;
    page.assert_class("#nav-menu", "active", true)?;

    page.click(r##"a[href="#services"]"##)?;
    page.assert_class("#hamburger", "active", false)?;
    page.assert_class("#nav-menu", "active", false)?;

    // Section top 600 minus the fixed header.
    assert_eq!(page.scroll_y(), 520);
    page.assert_class("#navbar", "scrolled", true)?;
    page.assert_class(r##"a[href="#services"]"##, "active", true)?;
    page.assert_class(r##"a[href="#home"]"##, "active", false)?;
    Ok(())
}

#[test]
fn scroll_state_tracks_threshold_and_keeps_last_active_link() -> page_controller::Result<()> {
    let mut page = page_with_section_metrics()?;

    page.set_scroll_y(100)?;
    page.assert_class("#navbar", "scrolled", false)?;
    page.assert_class(r##"a[href="#home"]"##, "active", true)?;

    page.set_scroll_y(101)?;
    page.assert_class("#navbar", "scrolled", true)?;

    // Probe line 600 leaves [0, 600) and enters [600, 1300).
    page.set_scroll_y(500)?;
    page.assert_class(r##"a[href="#home"]"##, "active", false)?;
    page.assert_class(r##"a[href="#services"]"##, "active", true)?;

    // Past the last section nothing matches, so the highlight stays put.
    page.set_scroll_y(3000)?;
    page.assert_class(r##"a[href="#services"]"##, "active", true)?;

    page.set_scroll_y(0)?;
    page.assert_class("#navbar", "scrolled", false)?;
    page.assert_class(r##"a[href="#home"]"##, "active", true)?;
    page.assert_class(r##"a[href="#services"]"##, "active", false)?;
    Ok(())
}

#[test]
fn rescrolling_to_same_position_keeps_a_single_active_link() -> page_controller::Result<()> {
    let mut page = page_with_section_metrics()?;

    page.set_scroll_y(700)?;
    page.assert_class(r##"a[href="#services"]"##, "active", true)?;
    page.assert_count(".nav-link.active", 1)?;

    page.set_scroll_y(700)?;
    page.assert_class(r##"a[href="#services"]"##, "active", true)?;
    page.assert_count(".nav-link.active", 1)?;
    Ok(())
}

#[test]
fn bare_hash_and_unknown_fragment_anchors_are_inert() -> page_controller::Result<()> {
    let mut page = page_with_section_metrics()?;

    page.click("#logo-link")?;
    assert_eq!(page.scroll_y(), 0);

    page.click("#dead-anchor")?;
    assert_eq!(page.scroll_y(), 0);
    Ok(())
}

#[test]
fn reveal_waits_for_ten_percent_visibility() -> page_controller::Result<()> {
    let mut page = Page::from_html(NAV_PAGE_HTML)?;
    page.set_metrics("#card-privat", 1000, 100)?;
    page.assert_class("#card-privat", "visible", false)?;

    // Visible band ends at scroll_y + 800 - 50; nine pixels is short of 10%.
    page.set_scroll_y(259)?;
    page.assert_class("#card-privat", "visible", false)?;

    page.set_scroll_y(260)?;
    page.assert_class("#card-privat", "visible", true)?;

    // Scrolling back never takes the class away.
    page.set_scroll_y(0)?;
    page.assert_class("#card-privat", "visible", true)?;
    Ok(())
}

#[test]
fn taller_viewport_reveals_without_scrolling() -> page_controller::Result<()> {
    let mut page = Page::from_html(NAV_PAGE_HTML)?;
    page.set_metrics("#card-privat", 1000, 100)?;
    page.assert_class("#card-privat", "visible", false)?;

    page.set_viewport_height(1100)?;
    page.assert_class("#card-privat", "visible", true)?;
    Ok(())
}

#[test]
fn reveal_classes_and_stagger_are_assigned_at_mount() -> page_controller::Result<()> {
    let page = Page::from_html(NAV_PAGE_HTML)?;

    page.assert_class("#card-privat", "fade-in", true)?;
    page.assert_style("#card-privat", "transitionDelay", "0s")?;
    page.assert_style("#card-firma", "transitionDelay", "0.1s")?;
    page.assert_style("#card-fern", "transitionDelay", "0.2s")?;

    page.assert_class("#fleet-transporter", "fade-in", true)?;
    page.assert_style("#fleet-transporter", "transitionDelay", "0s")?;
    page.assert_style("#fleet-lkw", "transitionDelay", "0.2s")?;

    page.assert_class("#feature-versichert", "fade-in", true)?;
    page.assert_style("#feature-puenktlich", "transitionDelay", "0.1s")?;

    page.assert_class("#adresse-item", "slide-in-left", true)?;
    page.assert_style("#zeiten-item", "transitionDelay", "0.1s")?;

    page.assert_class("#form-container", "slide-in-right", true)?;
    Ok(())
}

#[test]
fn floating_label_follows_blur_state() -> page_controller::Result<()> {
    let mut page = Page::from_html(NAV_PAGE_HTML)?;

    page.focus("#name")?;
    page.type_text("#name", "Anna")?;
    page.blur("#name")?;
    page.assert_class("#name", "has-value", true)?;

    page.focus("#name")?;
    page.type_text("#name", "")?;
    page.blur("#name")?;
    page.assert_class("#name", "has-value", false)?;

    // Blurring a control that never held focus does not fire the listener.
    page.type_text("#phone", "030")?;
    page.blur("#phone")?;
    page.assert_class("#phone", "has-value", false)?;
    Ok(())
}

#[test]
fn tel_and_social_clicks_feed_analytics() -> page_controller::Result<()> {
    let mut page = Page::from_html(NAV_PAGE_HTML)?;

    page.click("#adresse-item a")?;
    page.click("#facebook-icon")?;

    let events = page.take_analytics_events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, AnalyticsKind::TelClick);
    assert_eq!(events[0].href, "tel:+4930555123");
    assert_eq!(events[1].kind, AnalyticsKind::SocialClick);
    assert_eq!(events[1].href, "https://www.facebook.com/blitzumzuege");
    assert!(page.take_analytics_events().is_empty());
    Ok(())
}

#[test]
fn critical_images_are_queued_for_preload() -> page_controller::Result<()> {
    let page = Page::from_html(NAV_PAGE_HTML)?;
    let urls = page.preload_requests();
    assert_eq!(urls.len(), 3);
    assert!(urls.iter().all(|url| url.starts_with("https://images.pexels.com/")));
    Ok(())
}

#[test]
fn trace_buffer_records_the_interaction_story() -> page_controller::Result<()> {
    let mut page = Page::from_html(NAV_PAGE_HTML)?;
    page.enable_trace(true);
    page.set_trace_stderr(false);

    page.set_scroll_y(150)?;
    page.submit("#contactForm")?;
    page.advance_time(10)?;

    let logs = page.take_trace_logs();
    assert!(logs.iter().any(|line| line.contains("[scroll] to=150")));
    assert!(logs.iter().any(|line| line.contains("[submit] rejected errors=5")));
    assert!(logs.iter().any(|line| line.contains("[event] done submit")));
    assert!(logs.iter().any(|line| line.contains("[timer] advance delta_ms=10")));
    assert!(page.take_trace_logs().is_empty());
    Ok(())
}

#[test]
fn dump_dom_renders_the_form_subtree() -> page_controller::Result<()> {
    let page = Page::from_html(NAV_PAGE_HTML)?;
    let dump = page.dump_dom("#contactForm")?;
    assert!(dump.contains("contactForm"));
    assert!(dump.contains("button"));
    Ok(())
}
