use page_controller::{Delivery, Error, Page, SubmissionRecord, SubmissionTransport};

const LANDING_PAGE_HTML: &str = r##"<!DOCTYPE html>
<html lang="de">
<head>
    <meta charset="UTF-8">
    <title>Blitz Umzüge Berlin - Ihr Umzugspartner</title>
</head>
<body>
    <nav class="navbar" id="navbar">
        <div class="nav-container">
            <div class="hamburger" id="hamburger">
                <span></span><span></span><span></span>
            </div>
            <ul class="nav-menu" id="nav-menu">
                <li><a href="#home" class="nav-link">Start</a></li>
                <li><a href="#services" class="nav-link">Leistungen</a></li>
                <li><a href="#contact" class="nav-link">Kontakt</a></li>
            </ul>
        </div>
    </nav>
    <section id="home" class="hero">
        <h1>Stressfrei umziehen in Berlin</h1>
        <a href="#contact" class="btn-primary">Jetzt Angebot sichern</a>
    </section>
    <section id="services">
        <div class="service-card">Privatumzug</div>
        <div class="service-card">Firmenumzug</div>
    </section>
    <section id="contact">
        <div class="contact-item"><a href="tel:+4930555123">030 555123</a></div>
        <div class="contact-form-container">
            <form id="contactForm">
                <div class="form-group">
                    <label for="name">Name</label>
                    <input type="text" id="name" name="name">
                </div>
                <div class="form-group">
                    <label for="email">E-Mail</label>
                    <input type="email" id="email" name="email">
                </div>
                <div class="form-group">
                    <label for="phone">Telefon</label>
                    <input type="tel" id="phone" name="phone">
                </div>
                <div class="form-group">
                    <label for="service">Service</label>
                    <select id="service" name="service">
                        <option value="">Bitte wählen</option>
                        <option value="privatumzug">Privatumzug</option>
                        <option value="firmenumzug">Firmenumzug</option>
                        <option value="fernumzug">Fernumzug</option>
                    </select>
                </div>
                <div class="form-group">
                    <label for="message">Nachricht</label>
                    <textarea id="message" name="message"></textarea>
                </div>
                <div class="form-group checkbox-group">
                    <input type="checkbox" id="privacy" name="privacy">
                    <label for="privacy">Datenschutzerklärung gelesen</label>
                </div>
                <button type="submit" class="btn-primary">Jetzt anfragen</button>
            </form>
        </div>
    </section>
</body>
</html>"##;

const SUBMIT_BUTTON: &str = r#"#contactForm button[type="submit"]"#;

fn fill_valid_form(page: &mut Page) -> page_controller::Result<()> {
    page.type_text("#name", "Anna Schmidt")?;
    page.type_text("#email", "anna.schmidt@example.de")?;
    page.type_text("#message", "Wir ziehen Ende Oktober von Berlin nach Hamburg um.")?;
    page.select_option("#service", "privatumzug")?;
    page.set_checked("#privacy", true)?;
    Ok(())
}

#[test]
fn empty_submit_marks_every_required_group() -> page_controller::Result<()> {
    let mut page = Page::from_html(LANDING_PAGE_HTML)?;
    page.click(SUBMIT_BUTTON)?;

    // Phone is optional, so five of the six groups fail.
    page.assert_count(".form-group.error", 5)?;
    page.assert_count(".error-message", 5)?;
    page.assert_text(
        ".form-group .error-message",
        "Bitte geben Sie Ihren vollständigen Namen ein.",
    )?;

    // The transport never ran, so nothing is scheduled and the button is live.
    assert!(page.pending_timers().is_empty());
    page.assert_disabled(SUBMIT_BUTTON, false)?;
    page.assert_text(SUBMIT_BUTTON, "Jetzt anfragen")?;
    Ok(())
}

#[test]
fn invalid_email_gets_german_error_message() -> page_controller::Result<()> {
    let mut page = Page::from_html(LANDING_PAGE_HTML)?;
    fill_valid_form(&mut page)?;
    page.type_text("#email", "anna.schmidt@example")?;
    page.click(SUBMIT_BUTTON)?;

    page.assert_count(".form-group.error", 1)?;
    page.assert_text(
        ".error-message",
        "Bitte geben Sie eine gültige E-Mail-Adresse ein.",
    )?;
    Ok(())
}

#[test]
fn short_phone_number_is_rejected_until_extended() -> page_controller::Result<()> {
    let mut page = Page::from_html(LANDING_PAGE_HTML)?;
    fill_valid_form(&mut page)?;

    // Two digits format to "+4912", which stays under the six-character floor.
    page.type_text("#phone", "12")?;
    page.assert_value("#phone", "+4912")?;
    page.click(SUBMIT_BUTTON)?;
    page.assert_count(".form-group.error", 1)?;
    page.assert_text(
        ".error-message",
        "Bitte geben Sie eine gültige Telefonnummer ein.",
    )?;

    page.type_text("#phone", "030 555123")?;
    page.click(SUBMIT_BUTTON)?;
    page.assert_count(".form-group.error", 0)?;
    page.assert_disabled(SUBMIT_BUTTON, true)?;
    Ok(())
}

#[test]
fn cleared_phone_field_keeps_country_prefix() -> page_controller::Result<()> {
    let mut page = Page::from_html(LANDING_PAGE_HTML)?;
    fill_valid_form(&mut page)?;

    // Once touched, the formatter never lets the field go blank again, and the
    // leftover "+49" is too short to validate.
    page.type_text("#phone", "030 555123")?;
    page.type_text("#phone", "")?;
    page.assert_value("#phone", "+49")?;

    page.click(SUBMIT_BUTTON)?;
    page.assert_count(".form-group.error", 1)?;
    page.assert_text(
        ".error-message",
        "Bitte geben Sie eine gültige Telefonnummer ein.",
    )?;
    Ok(())
}

#[test]
fn umlauts_count_as_single_characters() -> page_controller::Result<()> {
    let mut page = Page::from_html(LANDING_PAGE_HTML)?;
    fill_valid_form(&mut page)?;

    // Nine characters, rejected.
    page.type_text("#message", "Grüße du!")?;
    page.click(SUBMIT_BUTTON)?;
    page.assert_count(".form-group.error", 1)?;
    page.assert_text(
        ".error-message",
        "Bitte geben Sie eine Nachricht mit mindestens 10 Zeichen ein.",
    )?;

    // Ten characters, accepted.
    page.type_text("#message", "Grüße dir!")?;
    page.click(SUBMIT_BUTTON)?;
    page.assert_count(".form-group.error", 0)?;
    page.assert_disabled(SUBMIT_BUTTON, true)?;
    Ok(())
}

#[test]
fn retry_clears_error_classes_but_not_stale_messages() -> page_controller::Result<()> {
    let mut page = Page::from_html(LANDING_PAGE_HTML)?;
    page.click(SUBMIT_BUTTON)?;
    page.assert_count(".form-group.error", 5)?;
    page.assert_count(".error-message", 5)?;

    page.type_text("#name", "Max Mustermann")?;
    page.click(SUBMIT_BUTTON)?;

    // The name group loses its error class, yet its old message node survives
    // because only groups failing again replace their marker.
    page.assert_count(".form-group.error", 4)?;
    page.assert_count(".error-message", 5)?;
    Ok(())
}

#[test]
fn successful_submission_walks_loading_then_success_banner() -> page_controller::Result<()> {
    let mut page = Page::from_html(LANDING_PAGE_HTML)?;
    fill_valid_form(&mut page)?;
    page.click(SUBMIT_BUTTON)?;

    page.assert_disabled(SUBMIT_BUTTON, true)?;
    page.assert_class(SUBMIT_BUTTON, "loading", true)?;
    page.assert_text(SUBMIT_BUTTON, "Wird gesendet...")?;
    page.assert_count(".success-message", 0)?;

    page.advance_time(1999)?;
    page.assert_disabled(SUBMIT_BUTTON, true)?;
    page.assert_count(".success-message", 0)?;

    page.advance_time(1)?;
    page.assert_text(
        ".success-message",
        "Vielen Dank! Ihre Nachricht wurde erfolgreich gesendet. Wir melden uns schnellstmöglich bei Ihnen.",
    )?;
    page.assert_class(".success-message", "show", true)?;
    page.assert_disabled(SUBMIT_BUTTON, false)?;
    page.assert_class(SUBMIT_BUTTON, "loading", false)?;
    page.assert_text(SUBMIT_BUTTON, "Jetzt anfragen")?;

    // Controls fall back to their markup defaults.
    page.assert_value("#name", "")?;
    page.assert_value("#message", "")?;
    page.assert_value("#service", "")?;
    page.assert_checked("#privacy", false)?;

    page.advance_time(5000)?;
    page.assert_class(".success-message", "show", false)?;
    page.assert_count(".success-message", 1)?;

    page.advance_time(299)?;
    page.assert_count(".success-message", 1)?;
    page.advance_time(1)?;
    page.assert_count(".success-message", 0)?;
    Ok(())
}

struct FlakyEndpoint;

impl SubmissionTransport for FlakyEndpoint {
    fn submit(&mut self, _record: &SubmissionRecord) -> Delivery {
        Delivery::failed_after(1500, "endpoint unreachable")
    }
}

#[test]
fn failed_delivery_shows_form_banner_and_restores_button() -> page_controller::Result<()> {
    let mut page = Page::from_html_with_transport(LANDING_PAGE_HTML, Box::new(FlakyEndpoint))?;
    fill_valid_form(&mut page)?;
    page.click(SUBMIT_BUTTON)?;
    page.assert_disabled(SUBMIT_BUTTON, true)?;

    page.advance_time(1500)?;
    page.assert_text(
        "#contactForm > .error-message",
        "Es gab einen Fehler beim Senden Ihrer Nachricht. Bitte versuchen Sie es erneut oder rufen Sie uns direkt an.",
    )?;
    page.assert_count(".success-message", 0)?;
    page.assert_disabled(SUBMIT_BUTTON, false)?;
    page.assert_class(SUBMIT_BUTTON, "loading", false)?;
    page.assert_text(SUBMIT_BUTTON, "Jetzt anfragen")?;

    // Failure keeps whatever the visitor typed.
    page.assert_value("#name", "Anna Schmidt")?;
    page.assert_checked("#privacy", true)?;

    // The next attempt clears the banner before validating.
    page.click(SUBMIT_BUTTON)?;
    page.assert_count("#contactForm > .error-message", 0)?;
    page.assert_disabled(SUBMIT_BUTTON, true)?;
    Ok(())
}

struct RecordingTransport {
    submissions: std::rc::Rc<std::cell::RefCell<Vec<SubmissionRecord>>>,
}

impl SubmissionTransport for RecordingTransport {
    fn submit(&mut self, record: &SubmissionRecord) -> Delivery {
        self.submissions.borrow_mut().push(record.clone());
        Delivery::accepted_after(100)
    }
}

#[test]
fn transport_receives_the_typed_record() -> page_controller::Result<()> {
    let submissions = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let transport = RecordingTransport {
        submissions: submissions.clone(),
    };
    let mut page = Page::from_html_with_transport(LANDING_PAGE_HTML, Box::new(transport))?;

    fill_valid_form(&mut page)?;
    page.type_text("#phone", "030 555123")?;
    page.click(SUBMIT_BUTTON)?;
    page.advance_time(100)?;

    let seen = submissions.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].name, "Anna Schmidt");
    assert_eq!(seen[0].email, "anna.schmidt@example.de");
    assert_eq!(seen[0].phone, "+49 3055 5123");
    assert_eq!(seen[0].service, "privatumzug");
    assert!(seen[0].privacy);
    Ok(())
}

#[test]
fn resubmit_while_sending_captures_sending_label() -> page_controller::Result<()> {
    let mut page = Page::from_html(LANDING_PAGE_HTML)?;
    fill_valid_form(&mut page)?;

    // Submitting the form directly sidesteps the disabled button, so a second
    // attempt can start while the first is still pending.
    page.submit("#contactForm")?;
    page.assert_disabled(SUBMIT_BUTTON, true)?;
    page.submit("#contactForm")?;
    assert_eq!(page.pending_timers().len(), 2);

    page.advance_time(2000)?;

    // The second attempt saved "Wird gesendet..." as the label to restore.
    page.assert_count(".success-message", 1)?;
    page.assert_disabled(SUBMIT_BUTTON, false)?;
    page.assert_text(SUBMIT_BUTTON, "Wird gesendet...")?;
    Ok(())
}

#[test]
fn second_success_replaces_banner_and_orphaned_timers_stay_quiet() -> page_controller::Result<()> {
    let mut page = Page::from_html(LANDING_PAGE_HTML)?;
    fill_valid_form(&mut page)?;
    page.click(SUBMIT_BUTTON)?;
    page.advance_time(2000)?;
    page.assert_count(".success-message", 1)?;

    // The form reset, so refill and go again while the first banner shows.
    fill_valid_form(&mut page)?;
    page.click(SUBMIT_BUTTON)?;
    page.advance_time(2000)?;
    page.assert_count(".success-message", 1)?;
    page.assert_class(".success-message", "show", true)?;

    // now_ms is 4000; the first banner's fade at 7000 targets a detached node.
    page.advance_time(3000)?;
    page.assert_class(".success-message", "show", true)?;

    page.advance_time(2000)?;
    page.assert_class(".success-message", "show", false)?;
    page.advance_time(300)?;
    page.assert_count(".success-message", 0)?;
    Ok(())
}

#[test]
fn page_mounts_without_the_optional_phone_field() -> page_controller::Result<()> {
    let html = r#"
        <div id="hamburger"></div>
        <ul id="nav-menu"></ul>
        <nav id="navbar"></nav>
        <form id="contactForm">
            <div class="form-group"><input type="text" id="name" name="name"></div>
            <div class="form-group"><input type="email" id="email" name="email"></div>
            <div class="form-group">
                <select id="service" name="service">
                    <option value="">Bitte wählen</option>
                    <option value="firmenumzug">Firmenumzug</option>
                </select>
            </div>
            <div class="form-group"><textarea id="message" name="message"></textarea></div>
            <div class="form-group"><input type="checkbox" id="privacy" name="privacy"></div>
            <button type="submit">Jetzt anfragen</button>
        </form>
    "#;

    let mut page = Page::from_html(html)?;
    page.click("button")?;
    // A missing phone control reads as blank, which the optional rule accepts.
    page.assert_count(".form-group.error", 5)?;

    page.type_text("#name", "Max Mustermann")?;
    page.type_text("#email", "max@example.de")?;
    page.select_option("#service", "firmenumzug")?;
    page.type_text("#message", "Bitte um ein Angebot für 40 Kartons.")?;
    page.set_checked("#privacy", true)?;
    page.click("button")?;
    page.assert_disabled("button", true)?;
    Ok(())
}

#[test]
fn driver_calls_surface_selector_misses() {
    let mut page = Page::from_html(LANDING_PAGE_HTML).expect("page should mount");
    match page.click("#does-not-exist") {
        Err(Error::SelectorNotFound(selector)) => assert_eq!(selector, "#does-not-exist"),
        other => panic!("expected a selector miss, got: {other:?}"),
    }

    match page.assert_text("#name", "niemals getippt") {
        Err(Error::AssertionFailed {
            expected, actual, ..
        }) => {
            assert_eq!(expected, "niemals getippt");
            assert_eq!(actual, "");
        }
        other => panic!("expected an assertion failure, got: {other:?}"),
    }
}
