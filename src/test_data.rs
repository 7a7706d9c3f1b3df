#[cfg(test)]
pub const WXR_EXPORT: &str = r##"<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0"
	xmlns:excerpt="http://wordpress.org/export/1.2/excerpt/"
	xmlns:content="http://purl.org/rss/1.0/modules/content/"
	xmlns:wfw="http://wellformedweb.org/CommentAPI/"
	xmlns:dc="http://purl.org/dc/elements/1.1/"
	xmlns:wp="http://wordpress.org/export/1.2/"
>
<channel>
	<title>Ferg's Notes</title>
	<link>https://example.com</link>
	<description>Things I wrote down</description>
	<language>en-US</language>
	<wp:wxr_version>1.2</wp:wxr_version>
	<wp:base_site_url>https://example.com</wp:base_site_url>
	<wp:base_blog_url>https://example.com</wp:base_blog_url>
	<wp:author><wp:author_id>1</wp:author_id><wp:author_login><![CDATA[andrew]]></wp:author_login><wp:author_email><![CDATA[andrew@example.com]]></wp:author_email><wp:author_display_name><![CDATA[Andrew Ferguson]]></wp:author_display_name></wp:author>
	<image>
		<title>Ferg's Notes logo</title>
		<url>https://example.com/logo.png</url>
	</image>
	<item>
		<title>Hello World</title>
		<link>https://example.com/2021/01/hello-world/</link>
		<pubDate>Fri, 01 Jan 2021 12:00:00 +0000</pubDate>
		<dc:creator><![CDATA[andrew]]></dc:creator>
		<description></description>
		<content:encoded><![CDATA[First paragraph.

[caption id="attachment_7" align="aligncenter" width="300"]<img src="https://example.com/wp-content/uploads/2020/01/img.jpg" alt="" width="300" height="200" /> A caption[/caption]

See https://example.com/about for more.]]></content:encoded>
		<wp:post_id>5</wp:post_id>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_type><![CDATA[post]]></wp:post_type>
		<wp:comment>
			<wp:comment_id>1</wp:comment_id>
			<wp:comment_author><![CDATA[Jane]]></wp:comment_author>
			<wp:comment_date><![CDATA[2021-01-02 10:05:00]]></wp:comment_date>
			<wp:comment_date_gmt><![CDATA[2021-01-02 18:05:00]]></wp:comment_date_gmt>
			<wp:comment_content><![CDATA[Nice <b>post</b>!]]></wp:comment_content>
			<wp:comment_approved><![CDATA[1]]></wp:comment_approved>
		</wp:comment>
		<wp:comment>
			<wp:comment_id>2</wp:comment_id>
			<wp:comment_author><![CDATA[Spammer]]></wp:comment_author>
			<wp:comment_date><![CDATA[2021-01-02 11:00:00]]></wp:comment_date>
			<wp:comment_date_gmt><![CDATA[2021-01-02 19:00:00]]></wp:comment_date_gmt>
			<wp:comment_content><![CDATA[Buy cheap things]]></wp:comment_content>
			<wp:comment_approved><![CDATA[spam]]></wp:comment_approved>
		</wp:comment>
		<wp:comment>
			<wp:comment_id>3</wp:comment_id>
			<wp:comment_author><![CDATA[Moderated]]></wp:comment_author>
			<wp:comment_date><![CDATA[2021-01-02 12:00:00]]></wp:comment_date>
			<wp:comment_content><![CDATA[Waiting]]></wp:comment_content>
			<wp:comment_approved><![CDATA[0]]></wp:comment_approved>
		</wp:comment>
		<wp:comment>
			<wp:comment_id>4</wp:comment_id>
			<wp:comment_author><![CDATA[Bob]]></wp:comment_author>
			<wp:comment_date><![CDATA[2021-01-03 09:00:00]]></wp:comment_date>
			<wp:comment_content><![CDATA[Bob liked this on Facebook.]]></wp:comment_content>
			<wp:comment_approved><![CDATA[1]]></wp:comment_approved>
		</wp:comment>
	</item>
	<item>
		<title>Year in Review</title>
		<pubDate>Fri, 31 Dec 2021 20:30:00 +0000</pubDate>
		<dc:creator><![CDATA[ghost]]></dc:creator>
		<content:encoded><![CDATA[It was a year.]]></content:encoded>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_type><![CDATA[post]]></wp:post_type>
	</item>
	<item>
		<title>Half written</title>
		<pubDate>Sun, 07 Jun 2020 08:00:00 +0000</pubDate>
		<dc:creator><![CDATA[andrew]]></dc:creator>
		<content:encoded><![CDATA[Not yet.]]></content:encoded>
		<wp:status><![CDATA[draft]]></wp:status>
		<wp:post_type><![CDATA[post]]></wp:post_type>
	</item>
	<item>
		<title>From the future</title>
		<pubDate>Sun, 07 Jun 2020 08:00:00 +0000</pubDate>
		<content:encoded><![CDATA[Status from a newer WordPress.]]></content:encoded>
		<wp:status><![CDATA[scheduled-review]]></wp:status>
		<wp:post_type><![CDATA[post]]></wp:post_type>
	</item>
	<item>
		<title>img.jpg</title>
		<pubDate>Sun, 07 Jun 2020 08:00:00 +0000</pubDate>
		<wp:status><![CDATA[inherit]]></wp:status>
		<wp:post_type><![CDATA[attachment]]></wp:post_type>
	</item>
	<item>
		<title>About</title>
		<pubDate>Mon, 30 Nov -0001 00:00:00 +0000</pubDate>
		<content:encoded><![CDATA[]]></content:encoded>
		<wp:status><![CDATA[publish]]></wp:status>
		<wp:post_type><![CDATA[page]]></wp:post_type>
	</item>
	<item>
		<title>Private notes</title>
		<content:encoded><![CDATA[Secret.]]></content:encoded>
		<wp:status><![CDATA[private]]></wp:status>
		<wp:post_type><![CDATA[page]]></wp:post_type>
	</item>
</channel>
</rss>
"##;

#[cfg(test)]
pub const WXR_NO_BASE_URL: &str = r##"<?xml version="1.0" encoding="UTF-8" ?>
<rss version="2.0" xmlns:wp="http://wordpress.org/export/1.2/">
<channel>
	<title>No base</title>
	<description>Missing wp:base_blog_url</description>
	<item>
		<title>Hello</title>
		<wp:status>publish</wp:status>
		<wp:post_type>post</wp:post_type>
	</item>
</channel>
</rss>
"##;
